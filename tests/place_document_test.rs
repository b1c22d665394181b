// End-to-end tests: place document bytes -> located payload -> decoded thumbnail
mod common;

use common::{jpeg_bytes, place_document, png_bytes, scan_data_start};
use place_thumb::thumbnail::{
    DecodeError, DocumentSource, LocateError, MARKER, ThumbnailError, ThumbnailHandler, decode,
    encode_png, locate,
};
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn scenario_200x100_baseline_jpeg() {
    let doc = place_document(&jpeg_bytes(200, 100));

    let payload = locate(&doc).expect("payload should be located");
    let image = decode(payload.bytes(), 256).expect("payload should decode");

    assert_eq!(image.width(), 200);
    assert_eq!(image.height(), 100);
    assert_eq!(image.data().len(), 100 * 600);
}

#[test]
fn round_trip_matches_header_dimensions() {
    for (width, height) in [(1, 1), (16, 9), (64, 200), (333, 17)] {
        let doc = place_document(&jpeg_bytes(width, height));

        let payload = locate(&doc).expect("payload should be located");
        let image = decode(payload.bytes(), 96).expect("payload should decode");

        assert_eq!((image.width(), image.height()), (width, height));
    }
}

#[test]
fn marker_at_end_has_no_payload() {
    let mut doc = b"<roblox><Item/>".to_vec();
    doc.extend_from_slice(MARKER);
    doc.push(0);

    assert!(matches!(locate(&doc), Err(LocateError::NoPayload { .. })));
}

#[test]
fn stride_padding_for_all_width_remainders() {
    for width in [1u32, 2, 3, 4, 5, 100, 101] {
        let height = 3;
        let doc = place_document(&png_bytes(width, height));

        let payload = locate(&doc).expect("payload should be located");
        let image = decode(payload.bytes(), 0).expect("payload should decode");

        let stride = (((width * 3) + 3) & !3) as usize;
        assert_eq!(image.data().len(), height as usize * stride, "width {}", width);
    }
}

#[test]
fn repeated_runs_are_byte_identical() {
    let doc = place_document(&jpeg_bytes(57, 43));

    let first = decode(locate(&doc).expect("locate").bytes(), 64).expect("decode");
    let second = decode(locate(&doc).expect("locate").bytes(), 64).expect("decode");

    assert_eq!(first.data(), second.data());
    assert_eq!(first, second);
}

#[test]
fn corrupt_payload_fails_with_decode_error() {
    let doc = place_document(b"\x00\x01\x02\x03 random trailing bytes \xFE\xFD");

    let payload = locate(&doc).expect("payload should be located");
    let result = decode(payload.bytes(), 64);

    assert!(matches!(
        result,
        Err(DecodeError::UnsupportedOrCorruptFormat(_)) | Err(DecodeError::DecodeFailed(_))
    ));
}

#[test]
fn truncated_jpeg_payload_fails_with_decode_failed() {
    let jpeg = jpeg_bytes(200, 100);
    let scan = scan_data_start(&jpeg);

    for cut in [jpeg.len() / 2, jpeg.len() * 2 / 3, jpeg.len() * 3 / 4, jpeg.len() - 2] {
        assert!(cut > scan, "cut {} should land inside the scan", cut);
        let doc = place_document(&jpeg[..cut]);

        let payload = locate(&doc).expect("payload should be located");
        let result = decode(payload.bytes(), 256);
        assert!(
            matches!(result, Err(DecodeError::DecodeFailed(_))),
            "cut {}/{} should fail",
            cut,
            jpeg.len()
        );
    }
}

#[test]
fn handler_processes_file_and_exports_png() {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let path = std::env::temp_dir().join(format!("place_thumb_e2e_{}.rbxl", nanos));
    std::fs::write(&path, place_document(&jpeg_bytes(640, 480))).expect("write temp file failed");

    let handler = ThumbnailHandler::default();
    let rendered = handler
        .process(DocumentSource::FilePath(path.clone()), 256)
        .expect("process should succeed");

    assert_eq!((rendered.native_width, rendered.native_height), (640, 480));
    assert_eq!((rendered.image.width(), rendered.image.height()), (256, 192));
    assert_eq!(rendered.source_hint, "file");

    let png = encode_png(&rendered.image).expect("png export should succeed");
    let reloaded = decode(&png, 0).expect("exported png should decode");
    assert_eq!(reloaded, rendered.image);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn handler_error_codes_identify_the_failing_stage() {
    let handler = ThumbnailHandler::default();

    let cases: [(&[u8], &str, &str); 3] = [
        (b"<roblox></roblox", "marker_not_found", "locate"),
        (b"<roblox></roblox>\0", "no_payload", "locate"),
        (b"<roblox></roblox>\0garbage", "unsupported_format", "decode"),
    ];

    for (doc, code, stage) in cases {
        let error: ThumbnailError = handler
            .render(doc, 64)
            .expect_err("malformed document should fail");
        assert_eq!(error.code(), code);
        assert_eq!(error.stage(), stage);
    }
}
