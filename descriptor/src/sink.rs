//! Output sinks that descriptors write into.

/// Destination for rendered descriptions.
pub trait OutputSink {
    fn write(&mut self, chunk: &str);

    /// Whether the sink can render ANSI decoration.
    fn is_decorated(&self) -> bool;
}

/// In-memory sink that accumulates everything written to it.
///
/// # Examples
///
/// ```
/// use form_options_descriptor::{BufferedOutput, OutputSink};
///
/// let mut output = BufferedOutput::new(false);
/// output.write("hello\n");
/// assert_eq!(output.fetch(), "hello\n");
/// assert_eq!(output.fetch(), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BufferedOutput {
    buffer: String,
    decorated: bool,
}

impl BufferedOutput {
    pub fn new(decorated: bool) -> Self {
        Self {
            buffer: String::new(),
            decorated,
        }
    }

    /// Returns the accumulated content and empties the buffer.
    pub fn fetch(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

impl OutputSink for BufferedOutput {
    fn write(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
    }

    fn is_decorated(&self) -> bool {
        self.decorated
    }
}
