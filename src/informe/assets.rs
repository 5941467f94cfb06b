// Discovery and normalization of the banner (header/footer) images.

use log::{debug, info, warn};
use snafu::prelude::*;
use std::path::{Path, PathBuf};

use crate::informe::{InformeResult, MissingBannerImageSnafu};
use survey_report::{NormalizedImage, ReportAssets};

// Probe order for the uploaded and static banner files.
const BANNER_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "PNG", "JPG", "JPEG"];

/// Looks for `{stem}.{ext}` in a directory, trying the fixed extension list
/// in order.
fn find_banner_image(dir: &Path, stem: &str) -> Option<PathBuf> {
    for ext in BANNER_EXTENSIONS.iter() {
        let candidate = dir.join(format!("{}.{}", stem, ext));
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

/// Builds the banner asset candidates. Explicit paths win and must exist; the
/// working directory is probed next, the static images directory last.
pub fn locate_banner_images(
    work_dir: &Path,
    static_dir: Option<&Path>,
    header_image: Option<&str>,
    footer_image: Option<&str>,
) -> InformeResult<ReportAssets> {
    let resolve = |requested: Option<&str>, stem: &str| -> InformeResult<Option<PathBuf>> {
        match requested {
            Some(p) => {
                let path = PathBuf::from(p);
                ensure!(
                    path.exists(),
                    MissingBannerImageSnafu { path: p.to_string() }
                );
                Ok(Some(path))
            }
            None => Ok(find_banner_image(work_dir, stem)),
        }
    };

    let header = resolve(header_image, "encabezado")?;
    let footer = resolve(footer_image, "pie")?;

    let default_header = static_dir.and_then(|d| find_banner_image(d, "encabezado"));
    let default_footer = static_dir.and_then(|d| find_banner_image(d, "pie"));
    if default_header.is_some() || default_footer.is_some() {
        info!("Using static banner images from {:?}", static_dir);
    }

    Ok(ReportAssets {
        header_image: header,
        footer_image: footer,
        default_header_image: default_header,
        default_footer_image: default_footer,
    })
}

/// Converts an image to PNG when needed. Failure is recovered locally: the
/// original path is returned and a warning logged, never an error.
pub fn normalize_image(path: &Path) -> NormalizedImage {
    match try_convert(path) {
        Ok(result) => result,
        Err(e) => {
            warn!("normalize_image: could not convert {:?}: {}", path, e);
            NormalizedImage::Original(path.to_path_buf())
        }
    }
}

fn try_convert(path: &Path) -> Result<NormalizedImage, image::ImageError> {
    let reader = image::io::Reader::open(path)?.with_guessed_format()?;
    if reader.format() == Some(image::ImageFormat::Png) {
        return Ok(NormalizedImage::Original(path.to_path_buf()));
    }
    let img = reader.decode()?;
    let converted = converted_path(path);
    img.into_rgb8()
        .save_with_format(&converted, image::ImageFormat::Png)?;
    debug!("try_convert: {:?} -> {:?}", path, converted);
    Ok(NormalizedImage::Converted(converted))
}

fn converted_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("imagen");
    path.with_file_name(format!("{}_converted.png", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converted_file_keeps_the_stem() {
        assert_eq!(
            converted_path(Path::new("/tmp/encabezado.webp")),
            PathBuf::from("/tmp/encabezado_converted.png")
        );
    }

    #[test]
    fn normalization_failure_returns_the_original_path() {
        let path = Path::new("/nonexistent/encabezado.webp");
        assert_eq!(
            normalize_image(path),
            NormalizedImage::Original(path.to_path_buf())
        );
    }

    #[test]
    fn missing_directories_yield_no_candidates() {
        assert_eq!(
            find_banner_image(Path::new("/nonexistent"), "encabezado"),
            None
        );
    }
}
