use std::path::PathBuf;

use crate::models::ReportSpec;
use crate::pdf::layout::{decorate, layout};
use crate::pdf::writer::write_document;
use crate::pdf::{LogoImage, PageGeometry, RenderError};

/// Configuration for the document renderer
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Optional JPEG cover logo; a missing file is silently skipped
    pub logo_path: Option<PathBuf>,
    pub geometry: PageGeometry,
}

/// Renders a report spec to finished PDF bytes
///
/// Pass 1 lays the fixed section sequence out into pages; pass 2 stamps
/// the footer page numbers and header decoration now that the total
/// page count is known; the page set is then serialized in one piece.
pub fn execute_render(spec: &ReportSpec, config: &RenderConfig) -> Result<Vec<u8>, RenderError> {
    config.geometry.validate()?;

    let logo = config
        .logo_path
        .as_deref()
        .and_then(LogoImage::load);

    let mut pages = layout(spec, &config.geometry, logo.as_ref());
    decorate(
        &mut pages,
        spec.language.labels(),
        &spec.generated_at,
        &config.geometry,
    );
    Ok(write_document(&pages, logo.as_ref(), &config.geometry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, StageOutputs};

    fn spec() -> ReportSpec {
        ReportSpec {
            idea: "A subscription toolshed.".to_string(),
            outputs: StageOutputs {
                clarity: "c".into(),
                niche: "n".into(),
                action: "a".into(),
                strategy: "Plan.\nTO-DO:\n- file the paperwork".to_string(),
            },
            language: Language::English,
            username: "tester".to_string(),
            generated_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_render_produces_a_pdf() {
        let bytes = execute_render(&spec(), &RenderConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 5"));
    }

    #[test]
    fn test_missing_logo_is_skipped() {
        let config = RenderConfig {
            logo_path: Some(PathBuf::from("/nonexistent/logo.jpg")),
            ..Default::default()
        };
        let bytes = execute_render(&spec(), &config).unwrap();
        assert!(!String::from_utf8_lossy(&bytes).contains("/XObject"));
    }

    #[test]
    fn test_bad_geometry_is_fatal() {
        let config = RenderConfig {
            geometry: PageGeometry {
                width: 10.0,
                height: 10.0,
                margin: 72.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            execute_render(&spec(), &config),
            Err(RenderError::InvalidGeometry(_))
        ));
    }
}
