//! Server-Sent Events (SSE) decoding for streamed chat completions.
//!
//! [`EventStreamDecoder`] is the protocol state machine: it buffers raw
//! bytes, cuts complete events at blank lines, and extracts the text delta
//! of each `data:` payload. It does no I/O, so the same decoder drives the
//! async adapter [`decode_event_stream`] and the unit tests below.

use anyhow::Result;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::fmt;

use super::types::StreamResponse;

/// Marker at the start of every data line.
pub const DATA_PREFIX: &str = "data:";

/// Payload that ends the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Text produced by one call to [`EventStreamDecoder::push`] or
/// [`EventStreamDecoder::finish`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// One entry per event that carried text, in arrival order.
    pub fragments: Vec<String>,
    /// The terminal sentinel was seen; no further input is processed.
    pub done: bool,
}

/// Incremental decoder state for one response.
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    buffer: Vec<u8>,
    // No separator starts before this offset of `buffer`.
    scanned: usize,
    done: bool,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Appends `chunk` and decodes every event it completes.
    ///
    /// Chunks may split events, lines, or UTF-8 sequences anywhere. After
    /// the sentinel, input is ignored.
    pub fn push(&mut self, chunk: &[u8]) -> Decoded {
        let mut out = Decoded {
            done: self.done,
            ..Decoded::default()
        };
        if self.done {
            return out;
        }

        self.buffer.extend_from_slice(chunk);

        while let Some((end, separator_len)) = find_event_boundary(&self.buffer, self.scanned) {
            self.scanned = 0;
            let event: Vec<u8> = self.buffer.drain(..end + separator_len).collect();
            let outcome = decode_event(&String::from_utf8_lossy(&event[..end]));

            if let Some(text) = outcome.text {
                out.fragments.push(text);
            }
            if outcome.done {
                self.finish_early();
                out.done = true;
                break;
            }
        }

        // A separator split across pushes starts at most 3 bytes from the end.
        self.scanned = self.buffer.len().saturating_sub(3);
        out
    }

    /// Decodes whatever is left in the buffer as one final event.
    ///
    /// Called once the source reports end of input without a sentinel.
    pub fn finish(&mut self) -> Decoded {
        if self.done {
            return Decoded {
                done: true,
                ..Decoded::default()
            };
        }

        let leftover = std::mem::take(&mut self.buffer);
        self.done = true;

        let outcome = decode_event(&String::from_utf8_lossy(&leftover));
        Decoded {
            fragments: outcome.text.into_iter().collect(),
            done: true,
        }
    }

    fn finish_early(&mut self) {
        self.done = true;
        self.buffer.clear();
        self.scanned = 0;
    }
}

#[derive(Debug, Default)]
struct EventOutcome {
    text: Option<String>,
    done: bool,
}

/// Returns the start and length of the first blank-line separator at or
/// after `from`, in a single pass.
fn find_event_boundary(buffer: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..buffer.len()).find_map(|pos| {
        let rest = &buffer[pos..];
        if rest.starts_with(b"\n\n") {
            Some((pos, 2))
        } else if rest.starts_with(b"\r\n\r\n") {
            Some((pos, 4))
        } else {
            None
        }
    })
}

/// Decodes the data lines of one event, in document order.
fn decode_event(event: &str) -> EventOutcome {
    let mut outcome = EventOutcome::default();
    let mut text = String::new();

    for line in event.lines() {
        let Some(payload) = line.trim().strip_prefix(DATA_PREFIX) else {
            continue;
        };
        let payload = payload.trim();

        if payload == DONE_SENTINEL {
            outcome.done = true;
            break;
        }

        if let Some(delta) = parse_delta(payload) {
            text.push_str(&delta);
        }
    }

    if !text.is_empty() {
        outcome.text = Some(text);
    }
    outcome
}

/// Extracts the first choice's delta content from one payload.
///
/// Malformed payloads are discarded.
fn parse_delta(payload: &str) -> Option<String> {
    let response = match serde_json::from_str::<StreamResponse>(payload) {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(error = %e, "discarding malformed stream payload");
            return None;
        }
    };

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty())
}

/// Converts a raw SSE byte stream into a stream of text fragments.
///
/// The stream ends right after the sentinel without polling `byte_stream`
/// again, and dropping it releases the underlying connection. A transport
/// error is yielded once and ends the stream.
pub fn decode_event_stream<S, E>(byte_stream: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    async_stream::stream! {
        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut decoder = EventStreamDecoder::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(anyhow::Error::new(e).context("Stream error"));
                    return;
                }
            };

            let decoded = decoder.push(&chunk);
            for fragment in decoded.fragments {
                yield Ok(fragment);
            }
            if decoded.done {
                return;
            }
        }

        for fragment in decoder.finish().fragments {
            yield Ok(fragment);
        }
    }
}

/// Optional UI notifications around a streamed response.
///
/// They carry no protocol meaning; omitting them changes nothing about the
/// text that is delivered.
#[derive(Default)]
pub struct StreamHooks<'a> {
    on_first_token: Option<Box<dyn FnOnce() + 'a>>,
    on_done: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> StreamHooks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs right before the first text fragment is delivered.
    #[must_use]
    pub fn on_first_token(mut self, hook: impl FnOnce() + 'a) -> Self {
        self.on_first_token = Some(Box::new(hook));
        self
    }

    /// Runs once the stream concludes, by sentinel or end of body.
    #[must_use]
    pub fn on_done(mut self, hook: impl FnOnce() + 'a) -> Self {
        self.on_done = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for StreamHooks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHooks")
            .field("on_first_token", &self.on_first_token.is_some())
            .field("on_done", &self.on_done.is_some())
            .finish()
    }
}

/// Delivers every fragment of `text_stream` to `sink`, firing the hooks.
///
/// An error from the stream or the sink aborts delivery; `on_done` only
/// runs when the stream concluded normally.
pub async fn forward_text<S>(
    text_stream: S,
    hooks: StreamHooks<'_>,
    mut sink: impl FnMut(&str) -> Result<()>,
) -> Result<()>
where
    S: Stream<Item = Result<String>>,
{
    let StreamHooks {
        mut on_first_token,
        on_done,
    } = hooks;
    let mut text_stream = std::pin::pin!(text_stream);

    while let Some(fragment) = text_stream.next().await {
        let fragment = fragment?;
        if let Some(hook) = on_first_token.take() {
            hook();
        }
        sink(&fragment)?;
    }

    if let Some(hook) = on_done {
        hook();
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HELLO_WORLD: &str = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hello \"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"world\"}}]}\n\n",
        "data: [DONE]\n\n",
    );

    fn decode_chunks(chunks: &[&[u8]]) -> (String, bool) {
        let mut decoder = EventStreamDecoder::new();
        let mut text = String::new();
        for chunk in chunks {
            let decoded = decoder.push(chunk);
            text.extend(decoded.fragments);
            if decoded.done {
                return (text, true);
            }
        }
        let decoded = decoder.finish();
        text.extend(decoded.fragments);
        (text, false)
    }

    #[test]
    fn test_single_chunk() {
        assert_eq!(
            decode_chunks(&[HELLO_WORLD.as_bytes()]),
            ("Hello world".to_string(), true)
        );
    }

    #[test]
    fn test_every_split_point() {
        let bytes = HELLO_WORLD.as_bytes();
        for i in 0..=bytes.len() {
            let (a, b) = bytes.split_at(i);
            assert_eq!(
                decode_chunks(&[a, b]),
                ("Hello world".to_string(), true),
                "split at {i}"
            );
        }
    }

    #[test]
    fn test_every_pair_of_split_points() {
        let bytes = HELLO_WORLD.as_bytes();
        for i in 0..=bytes.len() {
            for j in i..=bytes.len() {
                let chunks = [&bytes[..i], &bytes[i..j], &bytes[j..]];
                assert_eq!(
                    decode_chunks(&chunks),
                    ("Hello world".to_string(), true),
                    "split at {i}/{j}"
                );
            }
        }
    }

    #[test]
    fn test_byte_at_a_time_with_multibyte_text() {
        let input = "data: {\"choices\":[{\"delta\":{\"content\":\"こんにちは\"}}]}\n\ndata: [DONE]\n\n";
        let chunks: Vec<&[u8]> = input.as_bytes().chunks(1).collect();

        assert_eq!(decode_chunks(&chunks), ("こんにちは".to_string(), true));
    }

    #[test]
    fn test_nothing_after_sentinel() {
        let input = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"kept\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"dropped\"}}]}\n\n",
        );
        let mut decoder = EventStreamDecoder::new();

        let decoded = decoder.push(input.as_bytes());
        assert_eq!(decoded.fragments, vec!["kept".to_string()]);
        assert!(decoded.done);

        let later = decoder.push(b"data: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n\n");
        assert!(later.fragments.is_empty());
        assert!(later.done);
        assert!(decoder.finish().fragments.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_skipped() {
        let input = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            "data: {not json}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n",
        );

        assert_eq!(decode_chunks(&[input.as_bytes()]), ("ab".to_string(), false));
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        let input = concat!(
            ": OPENROUTER PROCESSING\n\n",
            "event: message\nid: 1\ndata: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n",
        );

        assert_eq!(decode_chunks(&[input.as_bytes()]), ("x".to_string(), false));
    }

    #[test]
    fn test_empty_and_missing_content() {
        let input = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{}}]}\n\n",
            "data: {\"choices\":[]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"},\"finish_reason\":null}]}\n\n",
        );
        let mut decoder = EventStreamDecoder::new();

        assert!(decoder.push(input.as_bytes()).fragments.is_empty());
    }

    #[test]
    fn test_only_first_choice_is_used() {
        let input = "data: {\"choices\":[{\"delta\":{\"content\":\"one\"}},{\"delta\":{\"content\":\"two\"}}]}\n\n";

        assert_eq!(decode_chunks(&[input.as_bytes()]), ("one".to_string(), false));
    }

    #[test]
    fn test_multiple_data_lines_in_one_event() {
        let input = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"foo\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"bar\"}}]}\n\n",
        );
        let mut decoder = EventStreamDecoder::new();

        assert_eq!(
            decoder.push(input.as_bytes()).fragments,
            vec!["foobar".to_string()]
        );
    }

    #[test]
    fn test_leftover_is_flushed_at_end() {
        let input = "data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}";

        assert_eq!(decode_chunks(&[input.as_bytes()]), ("tail".to_string(), false));
    }

    #[test]
    fn test_malformed_leftover_is_discarded() {
        assert_eq!(
            decode_chunks(&[b"data: {\"choices\":[{\"del"]),
            (String::new(), false)
        );
    }

    #[test]
    fn test_crlf_separators() {
        let input = "data: {\"choices\":[{\"delta\":{\"content\":\"crlf\"}}]}\r\n\r\ndata: [DONE]\r\n\r\n";

        assert_eq!(decode_chunks(&[input.as_bytes()]), ("crlf".to_string(), true));
    }

    #[test]
    fn test_crlf_separator_split_across_pushes() {
        let input = "data: {\"choices\":[{\"delta\":{\"content\":\"crlf\"}}]}\r\n\r\ndata: [DONE]\r\n\r\n";
        let bytes = input.as_bytes();
        let first_separator = input.find("\r\n\r\n").unwrap();

        for i in first_separator..=first_separator + 4 {
            let chunks: Vec<&[u8]> = vec![&bytes[..i], &bytes[i..i + 1], &bytes[i + 1..]];
            assert_eq!(
                decode_chunks(&chunks),
                ("crlf".to_string(), true),
                "split at {i}"
            );
        }
    }

    #[test]
    fn test_boundary_search_resumes_from_offset() {
        assert_eq!(find_event_boundary(b"abc\n\ndef\n\n", 0), Some((3, 2)));
        assert_eq!(find_event_boundary(b"abc\n\ndef\n\n", 4), Some((8, 2)));
        assert_eq!(find_event_boundary(b"a\r\n\r\nb", 0), Some((1, 4)));
        assert_eq!(find_event_boundary(b"abc\n", 1), None);
    }

    #[test]
    fn test_large_event_in_small_chunks() {
        let content = "x".repeat(64 * 1024);
        let input = format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{content}\"}}}}]}}\n\ndata: [DONE]\n\n"
        );
        let chunks: Vec<&[u8]> = input.as_bytes().chunks(7).collect();

        assert_eq!(decode_chunks(&chunks), (content, true));
    }

    #[test]
    fn test_sentinel_without_space() {
        assert_eq!(decode_chunks(&[b"data:[DONE]\n\n"]), (String::new(), true));
    }

    fn chunked(parts: &[&'static str]) -> Vec<Result<Bytes, std::io::Error>> {
        parts
            .iter()
            .map(|part| Ok(Bytes::from_static(part.as_bytes())))
            .collect()
    }

    #[tokio::test]
    async fn test_stream_stops_polling_after_sentinel() {
        let polled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&polled);
        let source = futures_util::stream::iter(chunked(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel",
            "lo \"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"world\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"never\"}}]}\n\n",
        ]))
        .inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let fragments: Vec<String> = decode_event_stream(source)
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(fragments.concat(), "Hello world");
        assert_eq!(polled.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stream_error_is_surfaced() {
        let source = futures_util::stream::iter(vec![
            Ok(Bytes::from_static(
                b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
            )),
            Err(std::io::Error::other("connection reset")),
        ]);

        let items: Vec<Result<String>> = decode_event_stream(source).collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "a");
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_forward_text_fires_hooks_once() {
        let first = Cell::new(0);
        let done = Cell::new(0);
        let order = RefCell::new(Vec::new());
        let source = futures_util::stream::iter(chunked(&[HELLO_WORLD]));

        let hooks = StreamHooks::new()
            .on_first_token(|| {
                first.set(first.get() + 1);
                order.borrow_mut().push("first".to_string());
            })
            .on_done(|| done.set(done.get() + 1));

        forward_text(decode_event_stream(source), hooks, |text| {
            order.borrow_mut().push(text.to_string());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(first.get(), 1);
        assert_eq!(done.get(), 1);
        assert_eq!(
            order.into_inner(),
            vec!["first".to_string(), "Hello ".to_string(), "world".to_string()]
        );
    }

    #[tokio::test]
    async fn test_forward_text_without_output_still_completes() {
        let first = Cell::new(false);
        let done = Cell::new(false);
        let source = futures_util::stream::iter(chunked(&["data: [DONE]\n\n"]));

        let hooks = StreamHooks::new()
            .on_first_token(|| first.set(true))
            .on_done(|| done.set(true));

        forward_text(decode_event_stream(source), hooks, |_| Ok(()))
            .await
            .unwrap();

        assert!(!first.get());
        assert!(done.get());
    }

    #[tokio::test]
    async fn test_forward_text_without_hooks() {
        let mut out = String::new();
        let source = futures_util::stream::iter(chunked(&[HELLO_WORLD]));

        forward_text(decode_event_stream(source), StreamHooks::new(), |text| {
            out.push_str(text);
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(out, "Hello world");
    }
}
