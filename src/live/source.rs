use std::path::PathBuf;

/// Where the backend should read frames from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StreamSource {
    /// The backend's default webcam (`"0"`).
    #[default]
    DefaultCamera,
    /// Another camera index on the backend host.
    CustomCamera(String),
    /// A local video file that must be uploaded first.
    File(Option<PathBuf>),
    /// A remote video URL the backend fetches itself.
    ExternalUrl(String),
}

/// How a Start request proceeds for a given source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartPlan {
    /// Stream from this descriptor right away.
    Immediate(String),
    /// Upload the file, then stream from the returned server path.
    Upload(PathBuf),
    /// Nothing to start from.
    Nothing,
}

impl StreamSource {
    pub fn plan(&self) -> StartPlan {
        match self {
            Self::DefaultCamera => StartPlan::Immediate("0".to_string()),
            Self::CustomCamera(id) => non_empty(id),
            Self::File(Some(path)) => StartPlan::Upload(path.clone()),
            Self::File(None) => StartPlan::Nothing,
            Self::ExternalUrl(url) => non_empty(url),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DefaultCamera => "Default Webcam",
            Self::CustomCamera(_) => "External Camera",
            Self::File(_) => "Upload Video",
            Self::ExternalUrl(_) => "Video URL",
        }
    }
}

fn non_empty(value: &str) -> StartPlan {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        StartPlan::Nothing
    } else {
        StartPlan::Immediate(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_camera_uses_its_id() {
        assert_eq!(
            StreamSource::CustomCamera("2".into()).plan(),
            StartPlan::Immediate("2".into())
        );
        assert_eq!(
            StreamSource::DefaultCamera.plan(),
            StartPlan::Immediate("0".into())
        );
    }

    #[test]
    fn file_without_path_plans_nothing() {
        assert_eq!(StreamSource::File(None).plan(), StartPlan::Nothing);
        assert_eq!(
            StreamSource::File(Some("run.mp4".into())).plan(),
            StartPlan::Upload("run.mp4".into())
        );
    }

    #[test]
    fn blank_url_plans_nothing() {
        assert_eq!(StreamSource::ExternalUrl("  ".into()).plan(), StartPlan::Nothing);
        assert_eq!(
            StreamSource::ExternalUrl(" https://youtu.be/x ".into()).plan(),
            StartPlan::Immediate("https://youtu.be/x".into())
        );
    }
}
