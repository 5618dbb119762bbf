use crate::ast::{Component, Tag, TagKind, WalkControl};
use crate::delim::DelimiterSet;
use crate::error::{Result, TemplateError};
use crate::text;

/// Closing marker of the triple-mustache `{{{..}}}` literal form.
const TRIPLE_END: &str = "}}}";

/// Parse a template string into a component tree rooted at a text-less
/// component whose children are the top-level sequence.
///
/// `delims` is the marker set in force when parsing starts; set-delimiter
/// tags encountered in the input update it in place, so a caller re-parsing
/// lambda output under a live render sees delimiter changes carry through.
pub(crate) fn parse(input: &str, delims: &mut DelimiterSet) -> Result<Component> {
    Parser::new(input, delims).parse()
}

/// A pending section whose end tag has not been seen yet.
struct OpenSection {
    tag: Tag,
    /// Byte offset of the section-begin tag, for error messages.
    position: usize,
    /// Offset just past the begin tag's closing marker; the verbatim
    /// section text handed to lambdas starts here.
    body_start: usize,
}

/// A single-pass scanner over the template source.
///
/// Nested sections are handled with a stack of child collections: the first
/// element is always the root-level sequence, and a section-begin pushes a
/// fresh level that is popped and attached to its section component when
/// the matching end tag arrives.
struct Parser<'a, 'd> {
    input: &'a str,
    delims: &'d mut DelimiterSet,
    /// Current scan offset in bytes.
    pos: usize,
    nodes_stack: Vec<Vec<Component>>,
    open_sections: Vec<OpenSection>,
    /// Whether the default `{{`/`}}` markers are active; the triple-mustache
    /// form is only recognized while they are.
    default_delims: bool,
}

impl<'a, 'd> Parser<'a, 'd> {
    fn new(input: &'a str, delims: &'d mut DelimiterSet) -> Self {
        let default_delims = delims.is_default();
        Self {
            input,
            delims,
            pos: 0,
            nodes_stack: vec![Vec::new()],
            open_sections: Vec::new(),
            default_delims,
        }
    }

    fn parse(mut self) -> Result<Component> {
        let input = self.input;
        while self.pos < input.len() {
            let Some(ts) = find_from(input, &self.delims.begin, self.pos) else {
                // No tag left; the rest is literal text.
                self.append(Component::text(&input[self.pos..], self.pos));
                break;
            };
            if ts > self.pos {
                self.append(Component::text(&input[self.pos..ts], self.pos));
            }

            let mut tcs = ts + self.delims.begin.len();
            let unescaped_var = self.default_delims && input.as_bytes().get(tcs) == Some(&b'{');
            if unescaped_var {
                tcs += 1;
            }
            let (te, end_len) = {
                let end_marker = if unescaped_var {
                    TRIPLE_END
                } else {
                    self.delims.end.as_str()
                };
                match find_from(input, end_marker, tcs) {
                    Some(te) => (te, end_marker.len()),
                    None => return Err(TemplateError::UnclosedTag(ts)),
                }
            };

            let contents = text::trim(&input[tcs..te]);
            let tag = if contents.starts_with('=') {
                let Some(new_delims) = parse_set_delimiter(contents) else {
                    return Err(TemplateError::InvalidSetDelimiter(ts));
                };
                *self.delims = new_delims.clone();
                self.default_delims = self.delims.is_default();
                Tag {
                    kind: TagKind::SetDelimiter,
                    delimiters: Some(new_delims),
                    ..Tag::default()
                }
            } else {
                classify(unescaped_var, contents)
            };

            self.pos = te + end_len;

            match tag.kind {
                TagKind::SectionBegin | TagKind::SectionBeginInverted => {
                    self.open_sections.push(OpenSection {
                        tag,
                        position: ts,
                        body_start: self.pos,
                    });
                    self.nodes_stack.push(Vec::new());
                }
                TagKind::SectionEnd => {
                    let name = tag.name.clone();
                    self.append(Component::tagged(tag, ts));
                    if !self.close_section(ts) {
                        return Err(TemplateError::UnopenedSection { name, position: ts });
                    }
                }
                _ => self.append(Component::tagged(tag, ts)),
            }
        }

        self.close_remaining_sections();

        let mut root = Component::default();
        root.children = self.nodes_stack.pop().unwrap_or_default();
        check_sections_closed(&mut root)?;
        Ok(root)
    }

    /// Append a component to the current innermost child collection.
    fn append(&mut self, comp: Component) {
        if let Some(nodes) = self.nodes_stack.last_mut() {
            nodes.push(comp);
        }
    }

    /// Attach the innermost open section to its parent level, recording the
    /// verbatim body text `[body_start, end_position)`. Returns false when
    /// no section is open.
    fn close_section(&mut self, end_position: usize) -> bool {
        let Some(mut open) = self.open_sections.pop() else {
            return false;
        };
        let children = self.nodes_stack.pop().unwrap_or_default();
        open.tag.section_text = Some(self.input[open.body_start..end_position].to_string());
        let mut comp = Component::tagged(open.tag, open.position);
        comp.children = children;
        self.append(comp);
        true
    }

    /// Attach sections left open at end of input. They keep no section
    /// text; the post-scan check reports them as unclosed.
    fn close_remaining_sections(&mut self) {
        while let Some(open) = self.open_sections.pop() {
            let children = self.nodes_stack.pop().unwrap_or_default();
            let mut comp = Component::tagged(open.tag, open.position);
            comp.children = children;
            self.append(comp);
        }
    }
}

/// Every section must end with its own end tag; once verified, the end
/// marker has served its purpose and is dropped from the tree.
fn check_sections_closed(root: &mut Component) -> Result<()> {
    let mut error = None;
    root.walk_mut(&mut |comp| {
        if !comp.tag.is_section_begin() {
            // Only sections carry a body to descend into.
            return WalkControl::Skip;
        }
        let closed = comp
            .children
            .last()
            .is_some_and(|last| last.tag.is_section_end() && last.tag.name == comp.tag.name);
        if !closed {
            error = Some(TemplateError::UnclosedSection {
                name: comp.tag.name.clone(),
                position: comp.position,
            });
            return WalkControl::Stop;
        }
        comp.children.pop();
        WalkControl::Continue
    });
    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn find_from(input: &str, needle: &str, from: usize) -> Option<usize> {
    input[from..].find(needle).map(|i| i + from)
}

/// Classify trimmed tag contents by their leading sigil. The triple-mustache
/// form is already known to be an unescaped variable and keeps its contents
/// as the name.
fn classify(unescaped_var: bool, contents: &str) -> Tag {
    let mut tag = Tag::default();
    if unescaped_var {
        tag.kind = TagKind::UnescapedVariable;
        tag.name = contents.to_string();
        return tag;
    }
    if contents.is_empty() {
        tag.kind = TagKind::Variable;
        return tag;
    }
    tag.kind = match contents.as_bytes()[0] {
        b'#' => TagKind::SectionBegin,
        b'^' => TagKind::SectionBeginInverted,
        b'/' => TagKind::SectionEnd,
        b'>' => TagKind::Partial,
        b'&' => TagKind::UnescapedVariable,
        b'!' => TagKind::Comment,
        _ => TagKind::Variable,
    };
    tag.name = if tag.kind == TagKind::Variable {
        contents.to_string()
    } else {
        text::trim(&contents[1..]).to_string()
    };
    tag
}

/// Parse `"=<begin> <end>="` contents into a new marker pair.
fn parse_set_delimiter(contents: &str) -> Option<DelimiterSet> {
    // Smallest legal tag is "=X X=".
    if contents.len() < 5 || !contents.ends_with('=') {
        return None;
    }
    let inner = text::trim(&contents[1..contents.len() - 1]);
    let space = inner.find(' ')?;
    let begin = &inner[..space];
    let end = inner[space + 1..].trim_start_matches(' ');
    if !is_valid_delimiter(begin) || !is_valid_delimiter(end) {
        return None;
    }
    Some(DelimiterSet {
        begin: begin.to_string(),
        end: end.to_string(),
    })
}

/// Custom delimiters may not contain whitespace or the equals sign.
fn is_valid_delimiter(marker: &str) -> bool {
    !marker.is_empty() && !marker.chars().any(|c| c == '=' || c.is_ascii_whitespace())
}
