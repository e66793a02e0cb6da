//! Line-oriented SSE decoder for OpenAI-style chat-completion streams.
//!
//! Bytes may arrive split at any offset, including inside a multi-byte
//! character or a JSON payload. Only complete `\n`-terminated lines are
//! interpreted; the trailing partial line is kept for the next chunk.

use serde::Deserialize;

const DATA_PREFIX: &[u8] = b"data: ";
const DONE_MARKER: &[u8] = b"[DONE]";

const DEFAULT_MAX_PENDING_BYTES: usize = 1024 * 1024;
const DEFAULT_MAX_DEFERRALS: usize = 8;

/// One streamed chunk as emitted upstream.
#[derive(Debug, Deserialize)]
pub struct UpstreamChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

impl UpstreamChunk {
    /// The text carried by this chunk, if any.
    pub fn into_fragment(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
    }
}

/// Bounds on how long an unparseable line may hold up the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderLimits {
    /// Drop a deferred line once the pending buffer grows past this size.
    pub max_pending_bytes: usize,
    /// Drop a deferred line after it has been retried on this many pushes.
    pub max_deferrals: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_pending_bytes: DEFAULT_MAX_PENDING_BYTES,
            max_deferrals: DEFAULT_MAX_DEFERRALS,
        }
    }
}

enum Line {
    Ignored,
    Done,
    Chunk(Option<String>),
    Malformed,
}

/// Incremental decoder turning raw SSE bytes into text fragments.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    limits: DecoderLimits,
    deferrals: usize,
    finishing: bool,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: DecoderLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Whether the termination sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Bytes received but not yet consumed.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a chunk and return the fragments it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done {
            return Vec::new();
        }
        self.buffer.extend_from_slice(chunk);
        self.drain_lines()
    }

    /// Flush at end of stream.
    ///
    /// A final line without a trailing newline is interpreted once; anything
    /// still unparseable is discarded.
    pub fn finish(&mut self) -> Vec<String> {
        if self.done {
            return Vec::new();
        }
        if !self.buffer.is_empty() && !self.buffer.ends_with(b"\n") {
            self.buffer.push(b'\n');
        }
        self.finishing = true;
        let fragments = self.drain_lines();
        self.buffer.clear();
        fragments
    }

    fn drain_lines(&mut self) -> Vec<String> {
        let mut fragments = Vec::new();

        while !self.done {
            let Some(end) = self.buffer.iter().position(|b| *b == b'\n') else {
                break;
            };

            match classify(&self.buffer[..end]) {
                Line::Ignored => {}
                Line::Done => {
                    self.done = true;
                    self.buffer.clear();
                    break;
                }
                Line::Chunk(fragment) => fragments.extend(fragment),
                Line::Malformed => {
                    if !self.give_up_on_head_line(end) {
                        // Keep the line at the head and wait for more bytes.
                        self.deferrals += 1;
                        break;
                    }
                }
            }

            self.buffer.drain(..=end);
            self.deferrals = 0;
        }

        fragments
    }

    fn give_up_on_head_line(&self, line_len: usize) -> bool {
        if self.finishing {
            tracing::debug!(line_len, "Discarding unparseable line at end of stream");
            return true;
        }
        if self.deferrals >= self.limits.max_deferrals
            || self.buffer.len() > self.limits.max_pending_bytes
        {
            tracing::warn!(
                line_len,
                deferrals = self.deferrals,
                pending = self.buffer.len(),
                "Dropping SSE line that never became parseable"
            );
            return true;
        }
        false
    }
}

fn classify(line: &[u8]) -> Line {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Line::Ignored;
    };

    let payload = payload.trim_ascii();
    if payload == DONE_MARKER {
        return Line::Done;
    }

    match serde_json::from_slice::<UpstreamChunk>(payload) {
        Ok(chunk) => Line::Chunk(chunk.into_fragment()),
        Err(_) => Line::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(content: &str) -> String {
        let payload = serde_json::json!({"choices": [{"delta": {"content": content}}]});
        format!("data: {}\n\n", payload)
    }

    fn stream_of(fragments: &[&str]) -> Vec<u8> {
        let mut body: String = fragments.iter().map(|f| event(f)).collect();
        body.push_str("data: [DONE]\n\n");
        body.into_bytes()
    }

    fn decode_in_pieces(bytes: &[u8], split_points: &[usize]) -> String {
        let mut decoder = SseDecoder::new();
        let mut out = String::new();
        let mut start = 0;
        for &point in split_points {
            out.extend(decoder.push(&bytes[start..point]));
            start = point;
        }
        out.extend(decoder.push(&bytes[start..]));
        out.extend(decoder.finish());
        out
    }

    #[test]
    fn decodes_three_fragments_and_stops_at_sentinel() {
        let mut decoder = SseDecoder::new();
        let fragments = decoder.push(&stream_of(&["Hello", " there", "!"]));
        assert_eq!(fragments, vec!["Hello", " there", "!"]);
        assert!(decoder.is_done());
    }

    #[test]
    fn every_two_way_split_yields_the_same_text() {
        let bytes = stream_of(&["नमस्ते", " किसान", " 🌾", "!"]);
        for point in 0..=bytes.len() {
            assert_eq!(
                decode_in_pieces(&bytes, &[point]),
                "नमस्ते किसान 🌾!",
                "split at byte {point}"
            );
        }
    }

    #[test]
    fn byte_at_a_time_yields_the_same_text() {
        let bytes = stream_of(&["Use ", "neem ", "oil."]);
        let points: Vec<usize> = (1..bytes.len()).collect();
        assert_eq!(decode_in_pieces(&bytes, &points), "Use neem oil.");
    }

    #[test]
    fn payload_split_mid_json_contributes_once() {
        let bytes = event("urea");
        let mid = bytes.find("delta").unwrap();
        let mut decoder = SseDecoder::new();

        assert!(decoder.push(&bytes.as_bytes()[..mid]).is_empty());
        assert_eq!(decoder.push(&bytes.as_bytes()[mid..]), vec!["urea"]);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn ignores_non_data_lines_and_crlf() {
        let body = ": keep-alive\r\nevent: message\r\ndata: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\r\n\r\n";
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.push(body.as_bytes()), vec!["ok"]);
    }

    #[test]
    fn chunks_without_content_yield_nothing() {
        let body = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\
                    data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\
                    data: {\"choices\":[],\"usage\":{\"total_tokens\":3}}\n";
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(body.as_bytes()).is_empty());
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn input_after_sentinel_is_ignored() {
        let mut decoder = SseDecoder::new();
        decoder.push(b"data: [DONE]\n");
        assert!(decoder.push(event("late").as_bytes()).is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn malformed_line_is_deferred_then_dropped() {
        let limits = DecoderLimits {
            max_pending_bytes: usize::MAX,
            max_deferrals: 2,
        };
        let mut decoder = SseDecoder::with_limits(limits);

        // Deferred: holds back the valid line behind it.
        assert!(decoder.push(b"data: {broken\n").is_empty());
        assert!(decoder.push(event("a").as_bytes()).is_empty());
        // Third look at the same line exceeds the limit.
        assert_eq!(decoder.push(event("b").as_bytes()), vec!["a", "b"]);
    }

    #[test]
    fn oversized_pending_buffer_drops_deferred_line() {
        let limits = DecoderLimits {
            max_pending_bytes: 32,
            max_deferrals: usize::MAX,
        };
        let mut decoder = SseDecoder::with_limits(limits);

        assert!(decoder.push(b"data: not json\n").is_empty());
        assert_eq!(decoder.push(event("kharif").as_bytes()), vec!["kharif"]);
    }

    #[test]
    fn finish_flushes_unterminated_last_line() {
        let mut decoder = SseDecoder::new();
        let body = event("tail");
        let trimmed = body.trim_end();
        assert!(decoder.push(trimmed.as_bytes()).is_empty());
        assert_eq!(decoder.finish(), vec!["tail"]);
    }

    #[test]
    fn finish_discards_deferred_garbage() {
        let mut decoder = SseDecoder::new();
        decoder.push(b"data: {oops\n");
        assert!(decoder.finish().is_empty());
        assert_eq!(decoder.pending(), 0);
    }
}
