/// Integration tests: the full compress → encode → decode → decompress
/// pipeline through `Session`, with the bundled compressors.
///
/// Covers the byte-exact round trip across sizes, the per-direction state
/// rules (what a failure keeps and what it clears), artifact naming, and the
/// mapping of each broken input onto its error kind.
use bintxt_codecs::{GzipCompressor, ZstdCompressor};
use bintxt_core::text::{decode, encode};
use bintxt_core::{Compressor, PackError, PayloadError, SelectedFile, Session, Status};

/// Generate `len` deterministic bytes using a simple LCG.
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

/// Generate `len` highly compressible bytes (repeating pattern).
fn compressible_bytes(len: usize) -> Vec<u8> {
    let pattern = b"the quick brown fox jumps over the lazy dog. ";
    (0..len).map(|i| pattern[i % pattern.len()]).collect()
}

// ── helpers ───────────────────────────────────────────────────────────────

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("bintxt_test_{}", name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn gzip_session() -> Session {
    Session::new(Box::new(GzipCompressor))
}

// ── round trips ────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_sizes_gzip() {
    let gzip = GzipCompressor;
    for len in [0usize, 1, 3, 1000, 5_000_000] {
        let data = pseudo_random_bytes(len, len as u64 ^ 0xABCD);
        let compressed = gzip.compress(&data).unwrap();
        assert_eq!(gzip.decompress(&compressed).unwrap(), data, "length {len}");

        let text = encode(&compressed);
        let restored = gzip.decompress(&decode(&text).unwrap()).unwrap();
        assert_eq!(restored, data, "text round trip, length {len}");
    }
}

#[test]
fn test_roundtrip_sizes_zstd() {
    let zstd = ZstdCompressor;
    for len in [0usize, 1, 3, 1000, 1_000_000] {
        let data = pseudo_random_bytes(len, len as u64 + 17);
        let text = encode(&zstd.compress(&data).unwrap());
        assert_eq!(zstd.decompress(&decode(&text).unwrap()).unwrap(), data);
    }
}

#[test]
fn test_hello_world_scenario() {
    let mut session = gzip_session();
    let packed = session
        .compress(Some(SelectedFile::from_bytes("hello.txt", b"Hello, World!".to_vec())))
        .unwrap()
        .clone();
    assert_eq!(packed.raw_len, 13);

    let payload = SelectedFile::from_bytes(packed.file_name.clone(), packed.text.into_bytes());
    let restored = session.restore(Some(payload)).unwrap();
    assert_eq!(restored.bytes, b"Hello, World!");
    assert_eq!(restored.file_name, "hello.txt");
}

#[test]
fn test_session_roundtrip_from_disk() {
    let dir = temp_dir("disk");
    let data = compressible_bytes(300_000);
    let input = dir.join("report.pdf");
    std::fs::write(&input, &data).unwrap();

    let mut session = gzip_session().with_chunk_size(1000);
    let packed = session.compress(Some(SelectedFile::from_path(&input))).unwrap();
    assert_eq!(packed.file_name, "report.pdf.compressed.txt");
    assert!(
        (packed.text.len() as u64) < packed.raw_len,
        "compressible input should shrink even after text encoding"
    );
    assert_eq!(packed.compressed_len(), decode(&packed.text).unwrap().len() as u64);

    let payload_path = dir.join(&packed.file_name);
    std::fs::write(&payload_path, &packed.text).unwrap();

    let restored = session.restore(Some(SelectedFile::from_path(&payload_path))).unwrap();
    assert_eq!(restored.file_name, "report.pdf");
    assert_eq!(restored.bytes, data);
    assert_eq!(session.packed().status(), Status::Success);
    assert_eq!(session.restored().status(), Status::Success);
}

#[test]
fn test_chunk_size_does_not_change_payload() {
    let data = pseudo_random_bytes(200_003, 11);
    let mut a = gzip_session().with_chunk_size(3);
    let mut b = gzip_session();
    let text_a = a
        .compress(Some(SelectedFile::from_bytes("x", data.clone())))
        .unwrap()
        .text
        .clone();
    let text_b = b.compress(Some(SelectedFile::from_bytes("x", data))).unwrap().text.clone();
    assert_eq!(text_a, text_b);
}

#[test]
fn test_restore_accepts_trailing_newline() {
    let mut session = gzip_session();
    let text = session
        .compress(Some(SelectedFile::from_bytes("a.bin", vec![0, 1, 2, 255])))
        .unwrap()
        .text
        .clone();
    let payload = SelectedFile::from_bytes("a.bin.compressed.txt", format!("{text}\r\n").into_bytes());
    assert_eq!(session.restore(Some(payload)).unwrap().bytes, vec![0, 1, 2, 255]);
}

// ── state rules ────────────────────────────────────────────────────────────

#[test]
fn test_no_file_selected_is_noop() {
    let mut session = gzip_session();
    let err = session.compress(None).unwrap_err();
    assert!(matches!(err, PackError::NoFileSelected));
    assert!(!err.is_user_visible());
    assert_eq!(session.packed().status(), Status::Idle);

    assert!(matches!(session.restore(None), Err(PackError::NoFileSelected)));
    assert_eq!(session.restored().status(), Status::Idle);
    assert!(session.restored().error().is_none());
}

#[test]
fn test_restore_failure_keeps_previous_result() {
    let mut session = gzip_session();
    let text = session
        .compress(Some(SelectedFile::from_bytes("notes.md", b"# notes".to_vec())))
        .unwrap()
        .text
        .clone();
    session
        .restore(Some(SelectedFile::from_bytes("notes.md.compressed.txt", text.into_bytes())))
        .unwrap();

    let bad = SelectedFile::from_bytes("broken.compressed.txt", b"not base64!".to_vec());
    let err = session.restore(Some(bad)).unwrap_err();
    assert!(matches!(err, PackError::MalformedPayload(_)));

    let restored = session.restored();
    assert_eq!(restored.status(), Status::Failed);
    assert!(restored.error().unwrap().contains("malformed text payload"));
    assert_eq!(restored.result().unwrap().bytes, b"# notes");

    // The compress direction is untouched by a restore failure.
    assert_eq!(session.packed().status(), Status::Success);
    assert!(session.packed().result().is_some());

    session.restored_mut().dismiss_error();
    assert_eq!(session.restored().status(), Status::Idle);
    assert!(session.restored().error().is_none());
    assert!(session.restored().result().is_some());
}

#[test]
fn test_compress_failure_clears_result() {
    let mut session = gzip_session();
    session
        .compress(Some(SelectedFile::from_bytes("ok.bin", vec![1, 2, 3])))
        .unwrap();

    let missing = temp_dir("missing").join("does_not_exist.bin");
    let err = session.compress(Some(SelectedFile::from_path(missing))).unwrap_err();
    assert!(matches!(err, PackError::Io(_)), "got {err:?}");

    assert_eq!(session.packed().status(), Status::Failed);
    assert!(session.packed().result().is_none());
    assert!(session.packed().error().is_some());
    assert_eq!(session.restored().status(), Status::Idle);
}

// ── error mapping ──────────────────────────────────────────────────────────

#[test]
fn test_non_utf8_payload_is_malformed() {
    let mut session = gzip_session();
    let err = session
        .restore(Some(SelectedFile::from_bytes("x.compressed.txt", vec![0xFF, 0xFE, 0x41, 0x41])))
        .unwrap_err();
    assert!(matches!(err, PackError::MalformedPayload(PayloadError::NotText)), "got {err:?}");
}

#[test]
fn test_payload_outside_alphabet_is_malformed() {
    let mut session = gzip_session();
    let err = session
        .restore(Some(SelectedFile::from_bytes("x.compressed.txt", b"H4sI%AAA".to_vec())))
        .unwrap_err();
    assert!(
        matches!(err, PackError::MalformedPayload(PayloadError::InvalidCharacter { byte: b'%', .. })),
        "got {err:?}"
    );
}

#[test]
fn test_zero_bytes_are_invalid_stream() {
    let text = encode(&[0u8; 10]);
    assert_eq!(decode(&text).unwrap(), vec![0u8; 10]);

    for mut session in [gzip_session(), Session::new(Box::new(ZstdCompressor))] {
        let payload = SelectedFile::from_bytes("zeros.compressed.txt", text.clone().into_bytes());
        let err = session.restore(Some(payload)).unwrap_err();
        assert!(matches!(err, PackError::InvalidCompressedStream(_)), "got {err:?}");
    }
}

#[test]
fn test_wrong_compressor_is_invalid_stream() {
    let mut gzip = gzip_session();
    let text = gzip
        .compress(Some(SelectedFile::from_bytes("data.bin", compressible_bytes(5000))))
        .unwrap()
        .text
        .clone();

    let mut zstd = Session::new(Box::new(ZstdCompressor));
    let err = zstd
        .restore(Some(SelectedFile::from_bytes("data.bin.compressed.txt", text.into_bytes())))
        .unwrap_err();
    assert!(matches!(err, PackError::InvalidCompressedStream(_)), "got {err:?}");
}

#[test]
fn test_empty_payload_is_invalid_stream() {
    let mut session = gzip_session();
    let err = session
        .restore(Some(SelectedFile::from_bytes("empty.compressed.txt", Vec::new())))
        .unwrap_err();
    assert!(matches!(err, PackError::InvalidCompressedStream(_)), "got {err:?}");
}

#[test]
fn test_empty_file_roundtrip() {
    let mut session = gzip_session();
    let packed = session
        .compress(Some(SelectedFile::from_bytes("empty", Vec::new())))
        .unwrap()
        .clone();
    assert_eq!(packed.raw_len, 0);
    assert!(!packed.text.is_empty(), "an empty file still has a gzip header");

    let restored = session
        .restore(Some(SelectedFile::from_bytes(packed.file_name, packed.text.into_bytes())))
        .unwrap();
    assert!(restored.bytes.is_empty());
    assert_eq!(restored.file_name, "empty");
}

#[test]
fn test_oversized_chunk_size_is_clamped() {
    let data = pseudo_random_bytes(10_000, 21);
    let mut reference = gzip_session();
    let expected = reference
        .compress(Some(SelectedFile::from_bytes("big.bin", data.clone())))
        .unwrap()
        .text
        .clone();

    for chunk_size in [usize::MAX, 100_000_000_000] {
        let mut session = gzip_session().with_chunk_size(chunk_size);
        let text = session
            .compress(Some(SelectedFile::from_bytes("big.bin", data.clone())))
            .unwrap()
            .text
            .clone();
        assert_eq!(text, expected, "chunk size {chunk_size} changed the payload");

        let payload = SelectedFile::from_bytes("big.bin.compressed.txt", text.into_bytes());
        assert_eq!(session.restore(Some(payload)).unwrap().bytes, data);
    }
}

#[test]
fn test_compress_failure_keeps_restore_result() {
    let mut session = gzip_session();
    let text = session
        .compress(Some(SelectedFile::from_bytes("abc.txt", b"abc".to_vec())))
        .unwrap()
        .text
        .clone();
    session
        .restore(Some(SelectedFile::from_bytes("abc.txt.compressed.txt", text.into_bytes())))
        .unwrap();

    let missing = temp_dir("missing_after_restore").join("does_not_exist.bin");
    assert!(session.compress(Some(SelectedFile::from_path(missing))).is_err());

    assert_eq!(session.packed().status(), Status::Failed);
    let restored = session.restored();
    assert_eq!(restored.status(), Status::Success);
    assert!(restored.error().is_none());
    assert_eq!(restored.result().unwrap().bytes, b"abc");
}
