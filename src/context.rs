use crate::delim::DelimiterSet;
use crate::value::Value;

/// The stack of data frames a render walks for name resolution, innermost
/// frame last. Sections push one frame per iteration and pop it on exit;
/// `delimiters` tracks the markers currently in force so lambda output can
/// be parsed under them.
pub(crate) struct Context<'v> {
    frames: Vec<&'v Value>,
    pub delimiters: DelimiterSet,
}

impl<'v> Context<'v> {
    pub fn new(root: &'v Value) -> Self {
        Self {
            frames: vec![root],
            delimiters: DelimiterSet::default(),
        }
    }

    fn push(&mut self, frame: &'v Value) {
        self.frames.push(frame);
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    /// Run `f` with `frame` pushed, popping on the way out. Rendering a
    /// section body goes through here so the pop happens on error exits too.
    pub fn with_frame<R>(&mut self, frame: &'v Value, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push(frame);
        let out = f(self);
        self.pop();
        out
    }

    /// Resolve a possibly dotted name against the frame stack.
    ///
    /// `.` names the innermost frame itself. Otherwise the name is split on
    /// `.` and, for each frame from innermost outward, the segments are
    /// walked from the head; the first frame in which every segment resolves
    /// wins. A frame that fails mid-walk falls through to the next frame,
    /// restarting from the first segment.
    pub fn get(&self, name: &str) -> Option<&'v Value> {
        if name == "." {
            return self.frames.last().copied();
        }
        let segments = split_name(name);
        for frame in self.frames.iter().rev() {
            let mut var = Some(*frame);
            for segment in &segments {
                var = var.and_then(|v| v.get(segment));
                if var.is_none() {
                    break;
                }
            }
            if var.is_some() {
                return var;
            }
        }
        None
    }

    /// Partial names are never dotted: a single-key scan from the innermost
    /// frame outward.
    pub fn get_partial(&self, name: &str) -> Option<&'v Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }
}

/// Split a dotted name into segments, dropping one trailing empty segment
/// so `"a.b."` resolves like `"a.b"`.
fn split_name(name: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = name.split('.').collect();
    if segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}
