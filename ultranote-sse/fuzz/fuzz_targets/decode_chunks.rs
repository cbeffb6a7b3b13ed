#![no_main]
use libfuzzer_sys::fuzz_target;
use ultranote_sse::Decoder;

// The first two bytes pick where the body is split; the rest is the body.
fuzz_target!(|data: &[u8]| {
    let Some((head, body)) = data.split_first_chunk::<2>() else {
        return;
    };
    let cut = usize::from(u16::from_le_bytes(*head)) % (body.len() + 1);

    let mut whole = Decoder::new();
    let mut expected = whole.feed(body);
    let (tail, expected_summary) = whole.finish();
    expected.extend(tail);

    let mut split = Decoder::new();
    let mut actual = split.feed(&body[..cut]);
    actual.extend(split.feed(&body[cut..]));
    let (tail, actual_summary) = split.finish();
    actual.extend(tail);

    assert_eq!(actual, expected);
    assert_eq!(actual_summary, expected_summary);
});
