use crate::delim::DelimiterSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TagKind {
    /// Not a tag: the owning component is a text node.
    #[default]
    Invalid,
    Variable,
    UnescapedVariable,
    SectionBegin,
    SectionEnd,
    SectionBeginInverted,
    Comment,
    Partial,
    SetDelimiter,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Tag {
    pub name: String,
    pub kind: TagKind,
    /// Verbatim source between a section-begin and its matching end tag.
    /// Lambdas receive this text unrendered.
    pub section_text: Option<String>,
    /// Snapshot of the markers a set-delimiter tag installed, replayed into
    /// the context when the tag is rendered.
    pub delimiters: Option<DelimiterSet>,
}

impl Tag {
    pub fn is_section_begin(&self) -> bool {
        matches!(
            self.kind,
            TagKind::SectionBegin | TagKind::SectionBeginInverted
        )
    }

    pub fn is_section_end(&self) -> bool {
        self.kind == TagKind::SectionEnd
    }
}

/// One node of a parsed template. A component is either a run of literal
/// text (`tag.kind == Invalid`) or a tag, and sections own their body via
/// `children`. `position` is the byte offset of the node in the source,
/// kept for error messages.
#[derive(Debug, Clone, Default)]
pub(crate) struct Component {
    pub text: String,
    pub tag: Tag,
    pub children: Vec<Component>,
    pub position: usize,
}

impl Component {
    pub fn text(text: &str, position: usize) -> Self {
        Self {
            text: text.to_string(),
            position,
            ..Self::default()
        }
    }

    pub fn tagged(tag: Tag, position: usize) -> Self {
        Self {
            tag,
            position,
            ..Self::default()
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag.kind == TagKind::Invalid
    }

    /// Depth-first traversal over this component's descendants. `Continue`
    /// descends into the visited node's children, `Skip` does not, and
    /// `Stop` aborts the whole walk.
    pub fn walk_mut<F>(&mut self, f: &mut F) -> WalkControl
    where
        F: FnMut(&mut Component) -> WalkControl,
    {
        for child in &mut self.children {
            match f(child) {
                WalkControl::Stop => return WalkControl::Stop,
                WalkControl::Skip => {}
                WalkControl::Continue => {
                    if child.walk_mut(f) == WalkControl::Stop {
                        return WalkControl::Stop;
                    }
                }
            }
        }
        WalkControl::Continue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WalkControl {
    Continue,
    Skip,
    Stop,
}
