use crate::category::Category;
use crate::error::Error;
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::{debug, info, warn};
use xz2::read::XzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const BZIP2_MAGIC: [u8; 3] = *b"BZh";
const XZ_MAGIC: [u8; 6] = [0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00];

/// Compression wrapped around a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TarCompression {
    None,
    Gzip,
    Bzip2,
    Xz,
}

impl TarCompression {
    fn sniff(head: &[u8]) -> TarCompression {
        if head.starts_with(&GZIP_MAGIC) {
            TarCompression::Gzip
        } else if head.starts_with(&BZIP2_MAGIC) {
            TarCompression::Bzip2
        } else if head.starts_with(&XZ_MAGIC) {
            TarCompression::Xz
        } else {
            TarCompression::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    /// Plain, gzip, bzip2 or xz compressed tar, detected from the content.
    Tar,
}

impl ArchiveFormat {
    pub fn from_path(path: &Path) -> Option<ArchiveFormat> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "zip" => Some(ArchiveFormat::Zip),
            "tar" => Some(ArchiveFormat::Tar),
            _ => None,
        }
    }
}

/// Reasons an archive could not be unpacked. All of them are recoverable:
/// the archive is left where it is.
#[derive(ThisError, Debug)]
pub enum UnpackError {
    #[error("unsupported archive format")]
    Unsupported,

    #[error("unreadable zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Default, Clone)]
pub struct ArchiveSummary {
    /// Directories that received the content of an archive.
    pub expanded: Vec<PathBuf>,
    /// Archives left in place.
    pub skipped: Vec<PathBuf>,
}

/// Unpack every archive directly inside `root/archives` into a sibling
/// directory named after it and delete the archive on success.
pub fn expand_archives(root: &Path) -> Result<ArchiveSummary, Error> {
    let mut summary = ArchiveSummary::default();
    let archives_dir = root.join(Category::Archives.as_str());
    if !archives_dir.is_dir() {
        return Ok(summary);
    }

    let mut archives = Vec::new();
    for entry in fs::read_dir(&archives_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            archives.push(entry.path());
        }
    }
    archives.sort();

    for archive in archives {
        let destination = archive.with_extension("");
        let existed = destination.exists();

        match unpack(&archive, &destination) {
            Ok(()) => {
                fs::remove_file(&archive)?;
                info!(
                    "Expanded {} into {}",
                    archive.display(),
                    destination.display()
                );
                summary.expanded.push(destination);
            }
            Err(err) => {
                warn!("Skipping archive {}: {}", archive.display(), err);
                if !existed && destination.is_dir() {
                    if let Err(err) = fs::remove_dir_all(&destination) {
                        warn!(
                            "Could not remove partial extraction {}: {}",
                            destination.display(),
                            err
                        );
                    }
                }
                summary.skipped.push(archive);
            }
        }
    }

    Ok(summary)
}

/// Unpack `archive` into `destination`, creating it if needed.
///
/// Entries that would escape `destination` are rejected by the zip and tar
/// readers.
pub fn unpack(archive: &Path, destination: &Path) -> Result<(), UnpackError> {
    let format = ArchiveFormat::from_path(archive).ok_or(UnpackError::Unsupported)?;
    if destination == archive {
        return Err(UnpackError::Unsupported);
    }
    debug!("Unpacking {} as {:?}", archive.display(), format);

    match format {
        ArchiveFormat::Zip => {
            let mut zip = zip::ZipArchive::new(File::open(archive)?)?;
            zip.extract(destination)?;
        }
        ArchiveFormat::Tar => {
            let mut reader = BufReader::new(File::open(archive)?);
            let compression = TarCompression::sniff(reader.fill_buf()?);
            debug!("{} tar compression: {:?}", archive.display(), compression);
            fs::create_dir_all(destination)?;
            match compression {
                TarCompression::None => tar::Archive::new(reader).unpack(destination)?,
                TarCompression::Gzip => {
                    tar::Archive::new(GzDecoder::new(reader)).unpack(destination)?
                }
                TarCompression::Bzip2 => {
                    tar::Archive::new(BzDecoder::new(reader)).unpack(destination)?
                }
                TarCompression::Xz => {
                    tar::Archive::new(XzDecoder::new(reader)).unpack(destination)?
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, content) in files {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn tar_bytes(files: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ArchiveFormat::from_path(Path::new("a.ZIP")), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_path(Path::new("a.tar")), Some(ArchiveFormat::Tar));
        assert_eq!(ArchiveFormat::from_path(Path::new("a.rar")), None);
        assert_eq!(ArchiveFormat::from_path(Path::new(".zip")), None);
    }

    #[test]
    fn test_expands_zip_and_removes_original() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("archives")).unwrap();
        write_zip(
            &root.join("archives/bundle.zip"),
            &[("readme.txt", "hello"), ("nested/data.csv", "1,2")],
        );

        let summary = expand_archives(root).unwrap();

        assert_eq!(summary.expanded, vec![root.join("archives/bundle")]);
        assert!(summary.skipped.is_empty());
        assert!(!root.join("archives/bundle.zip").exists());
        assert_eq!(
            fs::read_to_string(root.join("archives/bundle/readme.txt")).unwrap(),
            "hello"
        );
        assert!(root.join("archives/bundle/nested/data.csv").is_file());
    }

    #[test]
    fn test_expands_plain_and_gzipped_tar() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("archives")).unwrap();
        fs::write(root.join("archives/plain.tar"), tar_bytes(&[("a.txt", "plain")])).unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes(&[("b.txt", "gz")])).unwrap();
        fs::write(root.join("archives/packed.tar"), encoder.finish().unwrap()).unwrap();

        let summary = expand_archives(root).unwrap();

        assert_eq!(summary.expanded.len(), 2);
        assert_eq!(
            fs::read_to_string(root.join("archives/plain/a.txt")).unwrap(),
            "plain"
        );
        assert_eq!(
            fs::read_to_string(root.join("archives/packed/b.txt")).unwrap(),
            "gz"
        );
    }

    #[test]
    fn test_expands_bzip2_and_xz_tar() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("archives")).unwrap();

        let mut bz = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        bz.write_all(&tar_bytes(&[("c.txt", "bz2")])).unwrap();
        fs::write(root.join("archives/bz.tar"), bz.finish().unwrap()).unwrap();

        let mut xz = xz2::write::XzEncoder::new(Vec::new(), 6);
        xz.write_all(&tar_bytes(&[("d.txt", "xz")])).unwrap();
        fs::write(root.join("archives/xz.tar"), xz.finish().unwrap()).unwrap();

        let summary = expand_archives(root).unwrap();

        assert!(summary.skipped.is_empty());
        assert_eq!(
            summary.expanded,
            vec![root.join("archives/bz"), root.join("archives/xz")]
        );
        assert_eq!(
            fs::read_to_string(root.join("archives/bz/c.txt")).unwrap(),
            "bz2"
        );
        assert_eq!(
            fs::read_to_string(root.join("archives/xz/d.txt")).unwrap(),
            "xz"
        );
        assert!(!root.join("archives/bz.tar").exists());
        assert!(!root.join("archives/xz.tar").exists());
    }

    #[test]
    fn test_tar_compression_sniffing() {
        assert_eq!(TarCompression::sniff(&[0x1f, 0x8b, 0x08]), TarCompression::Gzip);
        assert_eq!(TarCompression::sniff(b"BZh91AY"), TarCompression::Bzip2);
        assert_eq!(TarCompression::sniff(&XZ_MAGIC), TarCompression::Xz);
        assert_eq!(TarCompression::sniff(b"a.txt\0\0"), TarCompression::None);
        assert_eq!(TarCompression::sniff(&[]), TarCompression::None);
    }

    #[test]
    fn test_unsupported_and_corrupt_archives_are_skipped() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("archives")).unwrap();
        fs::write(root.join("archives/old.rar"), "Rar!").unwrap();
        fs::write(root.join("archives/broken.zip"), "not a zip").unwrap();
        write_zip(&root.join("archives/good.zip"), &[("x.txt", "x")]);

        let summary = expand_archives(root).unwrap();

        assert_eq!(summary.expanded, vec![root.join("archives/good")]);
        assert_eq!(
            summary.skipped,
            vec![root.join("archives/broken.zip"), root.join("archives/old.rar")]
        );
        assert!(root.join("archives/old.rar").is_file());
        assert!(root.join("archives/broken.zip").is_file());
        assert!(!root.join("archives/broken").exists());
        assert!(!root.join("archives/old").exists());
    }

    #[test]
    fn test_missing_archives_dir_is_noop() {
        let tmp = tempdir().unwrap();
        let summary = expand_archives(tmp.path()).unwrap();
        assert!(summary.expanded.is_empty());
        assert!(summary.skipped.is_empty());
    }
}
