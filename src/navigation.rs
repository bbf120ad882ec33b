//! Slide navigation primitives

use serde::Serialize;

use crate::client::ClmClient;
use crate::error::{ClmError, Result};
use crate::host::ClmHost;

/// Append `suffix` unless `slide` already ends with it.
///
/// Idempotent: `01-home` and `01-home.zip` both become `01-home.zip`.
pub fn normalize_slide_name(slide: &str, suffix: &str) -> String {
    if slide.ends_with(suffix) {
        slide.to_string()
    } else {
        format!("{slide}{suffix}")
    }
}

/// Where a `gotoSlide` command should land
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationTarget {
    /// Slide archive name, always suffixed
    pub slide: String,
    /// `None` means the current presentation
    pub presentation: Option<String>,
}

impl NavigationTarget {
    pub fn new(slide: &str, presentation: Option<&str>, suffix: &str) -> Result<Self> {
        let slide = slide.trim();
        if slide.is_empty() {
            return Err(ClmError::missing_input("slide name"));
        }
        Ok(Self {
            slide: normalize_slide_name(slide, suffix),
            presentation: presentation
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from),
        })
    }
}

impl<H: ClmHost> ClmClient<H> {
    pub fn go_to_next_slide(&self) {
        tracing::info!("Navigating to the next slide");
        self.host().next_slide();
    }

    pub fn go_to_previous_slide(&self) {
        tracing::info!("Navigating to the previous slide");
        self.host().prev_slide();
    }

    /// Jump to `slide` (suffix optional), in `presentation` if given.
    /// An empty slide name is logged and ignored.
    pub fn go_to_slide(&self, slide: &str, presentation: Option<&str>) {
        match NavigationTarget::new(slide, presentation, &self.config().navigation.archive_suffix) {
            Ok(target) => self.navigate(&target),
            Err(err) => tracing::warn!("Not navigating: {}", err),
        }
    }

    pub(crate) fn navigate(&self, target: &NavigationTarget) {
        match &target.presentation {
            Some(presentation) => {
                tracing::info!("Navigating to {} in {}", target.slide, presentation)
            }
            None => tracing::info!("Navigating to {}", target.slide),
        }
        self.host()
            .goto_slide(&target.slide, target.presentation.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixing_is_idempotent() {
        assert_eq!(normalize_slide_name("01-home", ".zip"), "01-home.zip");
        assert_eq!(normalize_slide_name("01-home.zip", ".zip"), "01-home.zip");
        let twice = normalize_slide_name(&normalize_slide_name("02-efficacy", ".zip"), ".zip");
        assert_eq!(twice, "02-efficacy.zip");
    }

    #[test]
    fn target_rejects_blank_slide() {
        assert!(NavigationTarget::new("  ", None, ".zip").is_err());
    }

    #[test]
    fn blank_presentation_means_current() {
        let target = NavigationTarget::new("01-home", Some(""), ".zip").unwrap();
        assert_eq!(target.presentation, None);

        let target = NavigationTarget::new("01-home", Some("P1"), ".zip").unwrap();
        assert_eq!(target.presentation.as_deref(), Some("P1"));
    }
}
