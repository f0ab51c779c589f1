use super::*;

#[test]
fn filename_encodes_full_version_path() {
    let version = VersionRef { sat: 2, sub: 6, file: 14, ver: 3 };
    assert_eq!(download_filename(version), "sat2_sub6_file14_v3.bin");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn save_is_unavailable_off_browser() {
    assert!(save_bytes(b"payload", "x.bin").is_err());
}
