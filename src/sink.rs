use crate::style::RenderStyle;
use crate::units::Px;

/// A position in the text area, in pixels from its top left corner
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Pen {
    pub x: Px,
    pub y: Px,
}

impl Pen {
    pub fn new(x: Px, y: Px) -> Pen {
        Pen { x, y }
    }
}

/// One run of text to append to a render buffer
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SinkRun<'a> {
    pub text: &'a str,
    /// Where the run starts; `y` is the top of its line box
    pub pen: Pen,
    /// Offset of the whole block within the area, from alignment
    pub origin: Pen,
    pub font_size: u32,
    pub kerning: bool,
    /// Width the layout measured for the run
    pub width: Px,
}

/// Receives laid out text for drawing.
///
/// A buffer holds runs that share per-buffer state (outline width, shadow
/// softener and shadow colour); everything else in the style may change from
/// one run to the next.
pub trait TextSink {
    /// Renderer-owned handle to a buffer
    type Buffer: Copy;

    fn create_buffer(&mut self) -> Self::Buffer;

    /// Set the style that following runs in `buffer` are drawn with
    fn apply_style(&mut self, buffer: Self::Buffer, style: &RenderStyle);

    fn append_run(&mut self, buffer: Self::Buffer, run: &SinkRun<'_>);
}

/// A call made on a [RecordingSink]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCommand {
    CreateBuffer(usize),
    ApplyStyle {
        buffer: usize,
        style: RenderStyle,
    },
    AppendRun {
        buffer: usize,
        text: String,
        pen: Pen,
        origin: Pen,
        font_size: u32,
        kerning: bool,
    },
}

/// A [TextSink] that records every call, for headless use and inspection
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingSink {
    pub commands: Vec<SinkCommand>,
    buffers: usize,
}

impl RecordingSink {
    pub fn new() -> RecordingSink {
        RecordingSink::default()
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers
    }

    /// Text appended to each buffer, in order
    pub fn buffer_texts(&self) -> Vec<String> {
        let mut texts = vec![String::new(); self.buffers];
        for command in self.commands.iter() {
            if let SinkCommand::AppendRun { buffer, text, .. } = command {
                if let Some(slot) = texts.get_mut(*buffer) {
                    slot.push_str(text);
                }
            }
        }
        texts
    }

    /// Every appended run as `(text, pen)`
    pub fn runs(&self) -> Vec<(&str, Pen)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                SinkCommand::AppendRun { text, pen, .. } => Some((text.as_str(), *pen)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.buffers = 0;
    }
}

impl TextSink for RecordingSink {
    type Buffer = usize;

    fn create_buffer(&mut self) -> usize {
        let id = self.buffers;
        self.buffers += 1;
        self.commands.push(SinkCommand::CreateBuffer(id));
        id
    }

    fn apply_style(&mut self, buffer: usize, style: &RenderStyle) {
        self.commands.push(SinkCommand::ApplyStyle {
            buffer,
            style: *style,
        });
    }

    fn append_run(&mut self, buffer: usize, run: &SinkRun<'_>) {
        self.commands.push(SinkCommand::AppendRun {
            buffer,
            text: run.text.to_string(),
            pen: run.pen,
            origin: run.origin,
            font_size: run.font_size,
            kerning: run.kerning,
        });
    }
}

impl<S: TextSink + ?Sized> TextSink for &mut S {
    type Buffer = S::Buffer;

    fn create_buffer(&mut self) -> Self::Buffer {
        (**self).create_buffer()
    }

    fn apply_style(&mut self, buffer: Self::Buffer, style: &RenderStyle) {
        (**self).apply_style(buffer, style)
    }

    fn append_run(&mut self, buffer: Self::Buffer, run: &SinkRun<'_>) {
        (**self).append_run(buffer, run)
    }
}
