use tracing::debug;

use crate::Result;
use crate::config::{GalleryConfig, PageConfig};
use crate::dom::{Dom, NodeId};
use crate::event::{Event, EventKind, PageScript};
use crate::page::BrowserEnv;

const ACTIVE_CLASS: &str = "active";

/// `parseInt` on a `data-index` attribute: leading digits, sign allowed.
fn parse_index(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

/// Park photo gallery: a main image driven by thumbnails, prev/next buttons
/// and the arrow keys.
#[derive(Debug)]
pub struct GalleryController {
    total: i64,
    main_image: NodeId,
    thumbs: Vec<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    current: i64,
}

impl GalleryController {
    pub fn new(dom: &Dom, config: &GalleryConfig) -> Result<Option<Self>> {
        let Some(main_image) = dom.by_id(&config.main_image_id) else {
            return Ok(None);
        };
        let thumbs = dom.query_selector_all(&config.thumb_selector)?;
        if thumbs.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            total: i64::from(config.total_images),
            main_image,
            thumbs,
            prev: dom.query_selector(&config.prev_selector)?,
            next: dom.query_selector(&config.next_selector)?,
            current: 1,
        }))
    }

    pub fn mount(env: &mut BrowserEnv, config: &PageConfig) -> Result<Option<Box<dyn PageScript>>> {
        let Some(mut gallery) = Self::new(&env.dom, &config.gallery)? else {
            return Ok(None);
        };
        gallery.show(&mut env.dom, 1)?;
        Ok(Some(Box::new(gallery)))
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    fn thumb_for(&self, dom: &Dom, index: i64) -> Option<NodeId> {
        let wanted = index.to_string();
        self.thumbs
            .iter()
            .copied()
            .find(|thumb| dom.dataset(*thumb, "index").as_deref() == Some(wanted.as_str()))
    }

    /// Shows image `index` (1-based). Unknown indexes leave the gallery as is.
    pub fn show(&mut self, dom: &mut Dom, index: i64) -> Result<()> {
        let Some(thumb) = self.thumb_for(dom, index) else {
            return Ok(());
        };
        let src = dom.dataset(thumb, "src").unwrap_or_default();
        dom.set_attr(self.main_image, "src", &src)?;

        for item in &self.thumbs {
            dom.class_remove(*item, ACTIVE_CLASS)?;
        }
        dom.class_add(thumb, ACTIVE_CLASS)?;

        if let Some(prev) = self.prev {
            dom.set_disabled(prev, index == 1)?;
        }
        if let Some(next) = self.next {
            dom.set_disabled(next, index == self.total)?;
        }
        self.current = index;
        debug!(index, src, "gallery image shown");
        Ok(())
    }
}

impl PageScript for GalleryController {
    fn name(&self) -> &'static str {
        "gallery"
    }

    fn on_event(&mut self, env: &mut BrowserEnv, event: &mut Event) -> Result<()> {
        match event.kind() {
            EventKind::Click => {
                let clicked_thumb = self
                    .thumbs
                    .iter()
                    .copied()
                    .find(|thumb| event.hits(&env.dom, EventKind::Click, Some(*thumb)));
                if let Some(thumb) = clicked_thumb {
                    let index = env
                        .dom
                        .dataset(thumb, "index")
                        .and_then(|raw| parse_index(&raw));
                    if let Some(index) = index {
                        self.show(&mut env.dom, index)?;
                    }
                }
                if event.hits(&env.dom, EventKind::Click, self.prev) && self.current > 1 {
                    self.show(&mut env.dom, self.current - 1)?;
                } else if event.hits(&env.dom, EventKind::Click, self.next)
                    && self.current < self.total
                {
                    self.show(&mut env.dom, self.current + 1)?;
                }
            }
            EventKind::KeyDown => match event.key() {
                Some("ArrowLeft") => {
                    if let Some(prev) = self.prev {
                        env.request_click(prev);
                    }
                }
                Some("ArrowRight") => {
                    if let Some(next) = self.next {
                        env.request_click(next);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }
}

