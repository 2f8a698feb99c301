//! Page configuration. Every field defaults to the ids, keys and messages
//! the site templates use, so `PageConfig::default()` matches production.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub booking: BookingConfig,
    pub contact: ContactConfig,
    pub gallery: GalleryConfig,
    pub carousel: CarouselConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Session-storage key holding the booking draft.
    pub draft_key: String,
    pub gate_param: String,
    pub gate_value: String,
    pub form_id: String,
    pub guidelines_link_id: String,
    pub back_link_id: String,
    pub checkbox_id: String,
    pub park_select_id: String,
    pub visit_date_id: String,
    pub num_tickets_id: String,
    pub date_input_selector: String,
    pub return_button_id: String,
    /// Local-storage key set once the guidelines page has been shown.
    pub guidelines_read_key: String,
    pub acknowledgment_message: String,
    /// Remove a draft that no longer parses instead of retrying it on every load.
    pub clear_corrupt_draft: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            draft_key: "bookingFormData".into(),
            gate_param: "health_safety_read".into(),
            gate_value: "true".into(),
            form_id: "bookingForm".into(),
            guidelines_link_id: "health-link".into(),
            back_link_id: "backToProfile".into(),
            checkbox_id: "health_safety".into(),
            park_select_id: "parkSelect".into(),
            visit_date_id: "visitDate".into(),
            num_tickets_id: "numTickets".into(),
            date_input_selector: r#"input[type="date"]"#.into(),
            return_button_id: "returnToBooking".into(),
            guidelines_read_key: "healthSafetyRead".into(),
            acknowledgment_message:
                "You must acknowledge and agree to the health & safety guidelines.".into(),
            clear_corrupt_draft: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub form_id: String,
    pub submit_button_selector: String,
    pub email_pattern: String,
    /// Minimum lengths, counted in UTF-16 code units after trimming.
    pub min_name_chars: usize,
    pub min_message_chars: usize,
    pub loading_label: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            form_id: "contactForm".into(),
            submit_button_selector: ".cta-button.cta-send".into(),
            email_pattern: r"^[^\s@]+@[^\s@]+\.[^\s@]+$".into(),
            min_name_chars: 2,
            min_message_chars: 10,
            loading_label: "Sending...".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub main_image_id: String,
    pub thumb_selector: String,
    pub prev_selector: String,
    pub next_selector: String,
    pub total_images: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            main_image_id: "gallery-main-img".into(),
            thumb_selector: ".thumb-item".into(),
            prev_selector: ".prev-btn".into(),
            next_selector: ".next-btn".into(),
            total_images: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub track_selector: String,
    pub prev_selector: String,
    pub next_selector: String,
    pub scroll_step: i64,
    /// Slack in pixels when deciding whether the track sits at either end.
    pub edge_tolerance: i64,
    /// Re-check delays after load, for images that resize the track late.
    pub settle_delays_ms: Vec<i64>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            track_selector: ".parks-carousel".into(),
            prev_selector: ".carousel-arrow-left".into(),
            next_selector: ".carousel-arrow-right".into(),
            scroll_step: 300,
            edge_tolerance: 10,
            settle_delays_ms: vec![100, 500],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Fragment (without `#`) that scrolls its element into view on load.
    pub contact_anchor: String,
    pub scroll_delay_ms: i64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            contact_anchor: "contact".into(),
            scroll_delay_ms: 100,
        }
    }
}

impl PageConfig {
    /// Parses a JSON document; missing keys fall back to their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("booking.draft_key", &self.booking.draft_key),
            ("booking.gate_param", &self.booking.gate_param),
            ("booking.date_input_selector", &self.booking.date_input_selector),
            ("contact.email_pattern", &self.contact.email_pattern),
            ("gallery.thumb_selector", &self.gallery.thumb_selector),
            ("carousel.track_selector", &self.carousel.track_selector),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{name} must not be empty")));
            }
        }
        if self.gallery.total_images == 0 {
            return Err(Error::Config(
                "gallery.total_images must be at least 1".into(),
            ));
        }
        if self.carousel.scroll_step <= 0 {
            return Err(Error::Config(
                "carousel.scroll_step must be positive".into(),
            ));
        }
        if self
            .carousel
            .settle_delays_ms
            .iter()
            .chain(std::iter::once(&self.navigation.scroll_delay_ms))
            .any(|delay| *delay < 0)
        {
            return Err(Error::Config("timer delays must not be negative".into()));
        }
        Ok(())
    }
}
