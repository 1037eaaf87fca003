/// Configuration for the export steps applied to each record
///
/// # Example
///
/// ```
/// use dicomdeid_core::DeidConfig;
///
/// let config = DeidConfig::default().remove_pixel_data(true);
///
/// assert!(config.deidentify);
/// assert!(config.remove_pixel_data);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct DeidConfig {
    /// Substitute identifiers, apply the rule profile and shift dates
    pub deidentify: bool,

    /// Strip the pixel data element before export
    pub remove_pixel_data: bool,
}

impl Default for DeidConfig {
    fn default() -> Self {
        Self {
            deidentify: true,
            remove_pixel_data: false,
        }
    }
}

impl DeidConfig {
    /// Builder: Enable or disable de-identification
    pub fn deidentify(mut self, deidentify: bool) -> Self {
        self.deidentify = deidentify;
        self
    }

    /// Builder: Enable or disable pixel data removal
    pub fn remove_pixel_data(mut self, remove: bool) -> Self {
        self.remove_pixel_data = remove;
        self
    }
}
