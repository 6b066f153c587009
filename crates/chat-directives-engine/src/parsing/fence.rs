/// Code regions that suppress directive recognition.
///
/// Buffers passed in here always start at the opening fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
    /// `` `code` ``, closed by a backtick or a line break.
    Inline,
    /// ```` ```code``` ````, closed by three backticks.
    Triple,
    /// `<code>code</code>`.
    Tag,
}

/// How far a code block buffer has got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceProgress {
    /// Still reading the run of opening backticks.
    Opening,
    Open(Fence),
}

pub struct CodeFence;

impl CodeFence {
    pub const TICK: char = '`';
    pub const SINGLE: &'static str = "`";
    pub const TRIPLE: &'static str = "```";
    pub const OPEN_TAG: &'static str = "<code>";
    pub const CLOSE_TAG: &'static str = "</code>";

    /// Whether an outside buffer is exactly an opening fence.
    pub fn opens(buffer: &[char]) -> bool {
        [Self::SINGLE, Self::TRIPLE, Self::OPEN_TAG]
            .iter()
            .any(|fence| equals(buffer, fence))
    }

    pub fn progress(buffer: &[char]) -> FenceProgress {
        if buffer.first() != Some(&Self::TICK) {
            return FenceProgress::Open(Fence::Tag);
        }
        let ticks = buffer.iter().take_while(|&&c| c == Self::TICK).count();
        match ticks {
            n if n >= Self::TRIPLE.len() => FenceProgress::Open(Fence::Triple),
            n if n == buffer.len() => FenceProgress::Opening,
            _ => FenceProgress::Open(Fence::Inline),
        }
    }

    /// Whether a buffer that already includes the latest character closes
    /// `fence`. Inline fences close on a character alone and are handled by
    /// the caller.
    pub fn closes(fence: Fence, buffer: &[char]) -> bool {
        match fence {
            Fence::Inline => false,
            Fence::Triple => {
                buffer.len() >= Self::TRIPLE.len() * 2 && ends_with(buffer, Self::TRIPLE)
            }
            Fence::Tag => {
                buffer.len() >= Self::OPEN_TAG.len() + Self::CLOSE_TAG.len()
                    && ends_with(buffer, Self::CLOSE_TAG)
            }
        }
    }
}

fn equals(buffer: &[char], s: &str) -> bool {
    buffer.iter().copied().eq(s.chars())
}

fn ends_with(buffer: &[char], s: &str) -> bool {
    let n = s.chars().count();
    buffer.len() >= n && equals(&buffer[buffer.len() - n..], s)
}
