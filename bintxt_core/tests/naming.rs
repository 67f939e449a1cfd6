use bintxt_core::format::DEFAULT_RESTORED_NAME;
use bintxt_core::{packed_name, restored_name, SelectedFile};

#[test]
fn test_packed_name_appends_suffix() {
    assert_eq!(packed_name("report.pdf"), "report.pdf.compressed.txt");
    assert_eq!(packed_name("archive"), "archive.compressed.txt");
}

#[test]
fn test_restored_name_strips_suffix() {
    assert_eq!(restored_name("report.pdf.compressed.txt"), "report.pdf");
    assert_eq!(restored_name(&packed_name("a.b.c")), "a.b.c");
}

#[test]
fn test_restored_name_falls_back() {
    assert_eq!(restored_name("notes.txt"), DEFAULT_RESTORED_NAME);
    assert_eq!(restored_name(".compressed.txt"), DEFAULT_RESTORED_NAME);
    assert_eq!(restored_name("report.compressed.TXT"), DEFAULT_RESTORED_NAME);
}

#[test]
fn test_selected_file_name_is_last_component() {
    let file = SelectedFile::from_path("some/dir/photo.jpg");
    assert_eq!(file.name(), "photo.jpg");
}
