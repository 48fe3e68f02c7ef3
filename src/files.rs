//! File placement helpers: stable timestamped naming and replace-safe moves.
//!
//! Relocation is the commit point of the whole utility. A file moved out of
//! the upload folder will not be submitted again next cycle; a report moved
//! into the download folder must never be observable half-written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Suffix appended to relocated files, e.g. `_2024-03-01_1430220042`.
/// Second fraction is four digits (ten-thousandths) so repeated runs within
/// the same second still get distinct names.
pub fn timestamp_suffix(now: DateTime<Local>) -> String {
    format!(
        "_{}{:04}",
        now.format("%Y-%m-%d_%H%M%S"),
        now.timestamp_subsec_nanos() / 100_000
    )
}

/// Downloaded reports keep their extension: `orders.txt` becomes
/// `orders_2024-03-01_1430220042.txt`.
pub fn timestamped_download_name(file_name: &str, now: DateTime<Local>) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    match path.extension() {
        Some(ext) => format!("{stem}{}.{}", timestamp_suffix(now), ext.to_string_lossy()),
        None => format!("{stem}{}", timestamp_suffix(now)),
    }
}

/// Relocated feed files get the suffix after the full name:
/// `a.txt` becomes `a.txt_2024-03-01_1430220042`.
pub fn timestamped_upload_name(file_name: &str, now: DateTime<Local>) -> String {
    format!("{file_name}{}", timestamp_suffix(now))
}

/// Move `src` to `dest`, deleting any existing file at `dest` first.
///
/// Rename is preferred; when the source lives on another device the file is
/// copied next to the destination under a `.partial` name and renamed into
/// place, so the destination is either the complete new file or absent.
pub fn move_replacing(src: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if dest.exists() {
        fs::remove_file(dest)?;
    }
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            let partial = partial_path(dest);
            if let Err(e) = fs::copy(src, &partial) {
                let _ = fs::remove_file(&partial);
                return Err(e);
            }
            if let Err(e) = fs::rename(&partial, dest) {
                let _ = fs::remove_file(&partial);
                return Err(e);
            }
            fs::remove_file(src)
        }
    }
}

/// Move `src` into `folder`, appending the timestamp suffix to its name.
/// Returns the final path.
pub fn move_into_folder(
    src: &Path,
    folder: &Path,
    now: DateTime<Local>,
) -> io::Result<PathBuf> {
    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"))?;
    let dest = folder.join(timestamped_upload_name(&name, now));
    move_replacing(src, &dest)?;
    Ok(dest)
}

fn partial_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());
    dest.with_file_name(format!(".{name}.partial"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 22).unwrap()
    }

    #[test]
    fn suffix_matches_stable_scheme() {
        assert_eq!(timestamp_suffix(fixed_now()), "_2024-03-01_1430220000");
    }

    #[test]
    fn download_name_keeps_extension() {
        assert_eq!(
            timestamped_download_name("orders.txt", fixed_now()),
            "orders_2024-03-01_1430220000.txt"
        );
    }

    #[test]
    fn download_name_without_extension() {
        assert_eq!(
            timestamped_download_name("orders", fixed_now()),
            "orders_2024-03-01_1430220000"
        );
    }

    #[test]
    fn upload_name_appends_after_full_name() {
        assert_eq!(
            timestamped_upload_name("a.txt", fixed_now()),
            "a.txt_2024-03-01_1430220000"
        );
    }

    #[test]
    fn move_replacing_overwrites_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("incoming");
        let dest = dir.path().join("report.txt");
        fs::write(&dest, b"old").unwrap();
        fs::write(&src, b"new").unwrap();

        move_replacing(&src, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
        assert!(!src.exists());
    }

    #[test]
    fn move_into_folder_creates_folder_and_stamps_name() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("feed.txt");
        fs::write(&src, b"rows").unwrap();
        let completed = dir.path().join("completed");

        let dest = move_into_folder(&src, &completed, fixed_now()).unwrap();

        assert_eq!(
            dest.file_name().unwrap().to_string_lossy(),
            "feed.txt_2024-03-01_1430220000"
        );
        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"rows");
    }
}
