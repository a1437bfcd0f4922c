//! Result of a conversion run.

use serde::{Deserialize, Serialize};

/// Names of the generated PNG files, in page order.
///
/// Serialises as `{"images": ["report_page_0.png", ...]}`. Names are the
/// logical output names, without the `files/` workspace prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub images: Vec<String>,
}

impl ConversionOutput {
    /// Number of pages written.
    pub fn page_count(&self) -> usize {
        self.images.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_as_images_map() {
        let out = ConversionOutput {
            images: vec!["a_page_0.png".into(), "a_page_1.png".into()],
        };
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"{"images":["a_page_0.png","a_page_1.png"]}"#
        );
    }

    #[test]
    fn empty_output() {
        let out = ConversionOutput::default();
        assert_eq!(out.page_count(), 0);
        assert_eq!(serde_json::to_string(&out).unwrap(), r#"{"images":[]}"#);
    }
}
