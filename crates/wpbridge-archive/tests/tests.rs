use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use flate2::Compression;
use flate2::write::GzEncoder;
use wpbridge_archive::wpress::HEADER_SIZE;
use wpbridge_archive::{ArchiveRef, HandlerEvent, Reporter, WpressHeader, create};

fn recorder() -> (Reporter<HandlerEvent>, Arc<Mutex<Vec<HandlerEvent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (Reporter::new(move |e| sink.lock().unwrap().push(e)), seen)
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }
    zip.finish().unwrap();
}

fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

fn write_wpress(path: &Path, entries: &[(&str, &str, &[u8])]) {
    let mut out = Vec::new();
    for (prefix, name, data) in entries {
        let header = WpressHeader {
            name: (*name).to_owned(),
            size: data.len() as u64,
            mtime: "1718000000".to_owned(),
            prefix: (*prefix).to_owned(),
        };
        out.extend_from_slice(&header.encode().unwrap());
        out.extend_from_slice(data);
    }
    out.extend_from_slice(&[0u8; HEADER_SIZE]);
    std::fs::write(path, out).unwrap();
}

#[tokio::test]
async fn zip_listing_hides_platform_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.zip");
    write_zip(
        &path,
        &[
            ("sql/wp_options.sql", &b"-- options"[..]),
            ("__MACOSX/sql/._wp_options.sql", &b"junk"[..]),
            (".DS_Store", &b"junk"[..]),
            ("wp-content/uploads/.hidden/a.jpg", &b"junk"[..]),
            ("wp-content/uploads/a.jpg", &b"jpg"[..]),
        ],
    );
    let archive = ArchiveRef::new(&path, "application/zip");
    let handler = create(&archive).unwrap();

    let files = handler.list_files(&archive).await.unwrap();

    assert_eq!(files, ["sql/wp_options.sql", "wp-content/uploads/a.jpg"]);
}

#[tokio::test]
async fn zip_extraction_reports_start_and_complete_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.zip");
    write_zip(
        &path,
        &[
            ("wp-content/", &b""[..]),
            ("wp-content/themes/t/style.css", &b"body{}"[..]),
            ("__MACOSX/junk", &b"x"[..]),
        ],
    );
    let archive = ArchiveRef::new(&path, "application/zip");
    let dest = dir.path().join("out");
    let (events, seen) = recorder();

    create(&archive)
        .unwrap()
        .extract_files(&archive, &dest, &events)
        .await
        .unwrap();

    assert_eq!(
        std::fs::read(dest.join("wp-content/themes/t/style.css")).unwrap(),
        b"body{}"
    );
    assert!(!dest.join("__MACOSX").exists());
    assert_eq!(
        *seen.lock().unwrap(),
        [HandlerEvent::Start, HandlerEvent::Complete]
    );
}

#[tokio::test]
async fn tar_gz_extraction_reports_monotonic_progress() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.tar.gz");
    let blob: Vec<u8> = (0..200_000u32).map(|i| (i * 7 % 256) as u8).collect();
    write_tar_gz(
        &path,
        &[
            ("./wp-content/uploads/blob.bin", &blob[..]),
            ("./sql/wp_posts.sql", &b"-- posts"[..]),
            ("./.env", &b"SECRET=1"[..]),
        ],
    );
    let archive = ArchiveRef::new(&path, "application/gzip");
    let handler = create(&archive).unwrap();

    let files = handler.list_files(&archive).await.unwrap();
    assert_eq!(files, ["wp-content/uploads/blob.bin", "sql/wp_posts.sql"]);

    let dest = dir.path().join("out");
    let (events, seen) = recorder();
    handler.extract_files(&archive, &dest, &events).await.unwrap();

    assert_eq!(std::fs::read(dest.join("wp-content/uploads/blob.bin")).unwrap(), blob);
    assert!(!dest.join(".env").exists());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.first(), Some(&HandlerEvent::Start));
    assert_eq!(seen.last(), Some(&HandlerEvent::Complete));
    let progress: Vec<f64> = seen
        .iter()
        .filter_map(|e| match e {
            HandlerEvent::Progress { progress } => Some(*progress),
            _ => None,
        })
        .collect();
    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert!(progress.iter().all(|p| (0.0..=1.0).contains(p)));
}

#[tokio::test]
async fn tar_gz_listing_matches_extracted_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.tar.gz");
    let file = std::fs::File::create(&path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    let mut header = tar::Header::new_gnu();
    header.set_size(5);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "wp-content/plugins/p/p.php", &b"<?php"[..])
        .unwrap();
    let mut link = tar::Header::new_gnu();
    link.set_entry_type(tar::EntryType::Symlink);
    link.set_size(0);
    link.set_mode(0o777);
    builder
        .append_link(&mut link, "wp-content/plugins/p/link.php", "p.php")
        .unwrap();
    builder.into_inner().unwrap().finish().unwrap();

    let archive = ArchiveRef::new(&path, "application/gzip");
    let handler = create(&archive).unwrap();
    let files = handler.list_files(&archive).await.unwrap();
    assert_eq!(files, ["wp-content/plugins/p/p.php"]);

    let dest = dir.path().join("out");
    handler
        .extract_files(&archive, &dest, &Reporter::silent())
        .await
        .unwrap();
    for name in &files {
        assert!(dest.join(name).is_file());
    }
    assert!(std::fs::symlink_metadata(dest.join("wp-content/plugins/p/link.php")).is_err());
}

#[tokio::test]
async fn corrupted_tar_gz_emits_error_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.tar.gz");
    std::fs::write(&path, b"\x1f\x8b\x08\x00 definitely not gzip").unwrap();
    let archive = ArchiveRef::new(&path, "application/gzip");
    let (events, seen) = recorder();

    let result = create(&archive)
        .unwrap()
        .extract_files(&archive, &dir.path().join("out"), &events)
        .await;

    assert!(result.is_err());
    let seen = seen.lock().unwrap();
    assert_eq!(seen.first(), Some(&HandlerEvent::Start));
    assert!(matches!(seen.last(), Some(HandlerEvent::Error { .. })));
    assert!(!seen.contains(&HandlerEvent::Complete));
}

#[tokio::test]
async fn sql_file_is_a_single_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dump.sql");
    std::fs::write(&path, "CREATE TABLE t (id int);\n").unwrap();
    let archive = ArchiveRef::new(&path, "");
    let handler = create(&archive).unwrap();

    assert_eq!(handler.list_files(&archive).await.unwrap(), ["dump.sql"]);

    let dest = dir.path().join("out");
    handler
        .extract_files(&archive, &dest, &Reporter::silent())
        .await
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(dest.join("dump.sql")).unwrap(),
        "CREATE TABLE t (id int);\n"
    );
}

#[tokio::test]
async fn wpress_lists_in_archive_order_and_extracts_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.wpress");
    let entries: [(&str, &str, &[u8]); 5] = [
        (".", "package.json", &br#"{"Template":"t"}"#[..]),
        (".", "database.sql", &b"INSERT INTO `SERVMASK_PREFIX_options` VALUES (1);\n"[..]),
        ("uploads/2024/06", "photo.jpg", &[0xFFu8, 0xD8, 0xFF, 0x00, 0x01][..]),
        ("plugins/hello", "empty.txt", &b""[..]),
        ("themes/t", "style.css", &b"/* Theme Name: t */"[..]),
    ];
    write_wpress(&path, &entries);
    let archive = ArchiveRef::new(&path, "application/octet-stream");
    let handler = create(&archive).unwrap();

    let files = handler.list_files(&archive).await.unwrap();
    assert_eq!(
        files,
        [
            "package.json",
            "database.sql",
            "uploads/2024/06/photo.jpg",
            "plugins/hello/empty.txt",
            "themes/t/style.css",
        ]
    );

    let dest = dir.path().join("out");
    let (events, seen) = recorder();
    handler.extract_files(&archive, &dest, &events).await.unwrap();
    for ((_, _, data), rel) in entries.iter().zip(&files) {
        assert_eq!(std::fs::read(dest.join(rel)).unwrap(), *data, "{rel}");
    }
    assert_eq!(
        *seen.lock().unwrap(),
        [HandlerEvent::Start, HandlerEvent::Complete]
    );
}
