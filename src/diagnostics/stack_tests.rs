use super::*;

#[test]
fn keeps_only_frame_lines() {
    let raw = "AssertionError: expected true to be false
    at Object.<anonymous> (/src/test.ts:10:5)
some random line
    at run (/src/runner.ts:20:3)";

    let frames = filter_frames(raw);

    assert_eq!(frames.len(), 2);
    assert!(frames[0].contains("/src/test.ts:10:5"));
    assert!(frames[1].contains("/src/runner.ts:20:3"));
}

#[test]
fn drops_library_and_internal_frames() {
    let raw = "Error: fail
    at Object.<anonymous> (/src/test.ts:10:5)
    at Module._compile (node_modules/vitest/dist/index.js:1:1)
    at Module._load (node:internal/modules/cjs/loader:1218:14)";

    let frames = filter_frames(raw);

    assert_eq!(frames, vec!["    at Object.<anonymous> (/src/test.ts:10:5)"]);
}

#[test]
fn strips_escape_sequences_before_filtering() {
    let raw = "\x1b[31mError\x1b[0m\n    at Object.<anonymous> (\x1b[1m/src/test.ts\x1b[0m:10:5)";

    let frames = filter_frames(raw);

    assert_eq!(frames.len(), 1);
    assert!(!frames[0].contains('\x1b'));
    assert!(frames[0].ends_with("/src/test.ts:10:5)"));
}

#[yare::parameterized(
    no_frames     = { "TypeError: Cannot read property 'foo' of undefined" },
    empty         = { "" },
    only_library  = { "Error\n    at Module._compile (node_modules/vitest/dist/index.js:1:1)\n    at node:internal/modules/cjs/loader:1218:14" },
)]
fn yields_no_frames(raw: &str) {
    assert!(filter_frames(raw).is_empty());
}

#[yare::parameterized(
    line_and_column = { &["    at Object.<anonymous> (/src/test.ts:10:5)"],  Some((10, Some(5))) },
    line_only       = { &["    at Object.<anonymous> (/src/test.ts:42)"],    Some((42, None)) },
    bare_frame      = { &["    at /src/test.ts:7:9"],                        Some((7, Some(9))) },
    first_wins      = { &["    at first (/src/a.ts:10:5)", "    at second (/src/b.ts:20:3)"], Some((10, Some(5))) },
    skips_eval      = { &["    at eval (eval at <anonymous>, <anonymous>:1:1)", "    at Object.<anonymous> (/src/test.ts:15:5)"], Some((15, Some(5))) },
    only_eval       = { &["    at eval (eval at <anonymous>, <anonymous>:1:1)"], None },
    no_suffix       = { &["    at Object.<anonymous> (unknown)"],            None },
    empty           = { &[],                                                  None },
)]
fn location_cases(frames: &[&str], expected: Option<(u32, Option<u32>)>) {
    let location = extract_location(frames).map(|l| (l.line, l.column));
    assert_eq!(location, expected);
}

#[test]
fn scans_past_frames_without_suffix() {
    let frames = ["    at native (unknown)", "    at run (/src/runner.ts:20:3)"];
    assert_eq!(
        extract_location(&frames),
        Some(FrameLocation {
            file: "/src/runner.ts".into(),
            line: 20,
            column: Some(3),
        })
    );
}

#[test]
fn evaluate_named_function_is_not_eval() {
    let frames = ["    at evaluate (/src/evaluate.ts:4:2)"];
    assert_eq!(extract_location(&frames).map(|l| l.line), Some(4));
}

#[test]
fn strip_ansi_removes_color_codes() {
    assert_eq!(strip_ansi("\x1b[2mexpect(\x1b[22mreceived"), "expect(received");
}

#[yare::parameterized(
    parenthesized = { "    at Object.<anonymous> (/src/test.ts:10:5)",           "/src/test.ts" },
    bare          = { "    at /src/test.ts:7:9",                                  "/src/test.ts" },
    file_url      = { "    at file:///src/test.ts:3:1",                           "/src/test.ts" },
    async_frame   = { "    at async Promise.all (index 0) (/src/setup.ts:12:3)", "/src/setup.ts" },
)]
fn frame_names_its_file(frame: &str, file: &str) {
    assert_eq!(extract_location(&[frame]).unwrap().file, file);
}

#[test]
fn strip_ansi_removes_hyperlinks_without_eating_text() {
    let raw = "\x1b]8;;file:///src/test.ts\x07/src/test.ts\x1b]8;;\x07:10:5";
    assert_eq!(strip_ansi(raw), "/src/test.ts:10:5");
}

#[test]
fn strip_ansi_accepts_string_terminator() {
    let raw = "at \x1b]8;;file:///a.ts\x1b\\link\x1b]8;;\x1b\\ (/src/a.ts:1:2)";
    assert_eq!(strip_ansi(raw), "at link (/src/a.ts:1:2)");
}

#[test]
fn hyperlinked_frame_survives_filtering() {
    let raw = "Error: boom\n    at Object.<anonymous> (\x1b]8;;file:///src/test.ts\x07/src/test.ts:10:5\x1b]8;;\x07)";

    let frames = filter_frames(raw);

    assert_eq!(frames, vec!["    at Object.<anonymous> (/src/test.ts:10:5)"]);
    assert_eq!(extract_location(&frames).map(|l| l.line), Some(10));
}
