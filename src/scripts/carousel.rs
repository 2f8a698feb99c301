use tracing::trace;

use crate::Result;
use crate::config::{CarouselConfig, PageConfig};
use crate::dom::{Dom, NodeId};
use crate::event::{Event, EventKind, PageScript, TimerId};
use crate::page::BrowserEnv;

/// Horizontal parks carousel with arrow buttons that disable themselves at
/// either end of the track.
#[derive(Debug)]
pub struct CarouselController {
    track: NodeId,
    prev: NodeId,
    next: NodeId,
    step: i64,
    tolerance: i64,
    settle_timers: Vec<TimerId>,
}

impl CarouselController {
    pub fn new(dom: &Dom, config: &CarouselConfig) -> Result<Option<Self>> {
        let track = dom.query_selector(&config.track_selector)?;
        let prev = dom.query_selector(&config.prev_selector)?;
        let next = dom.query_selector(&config.next_selector)?;
        let (Some(track), Some(prev), Some(next)) = (track, prev, next) else {
            return Ok(None);
        };
        Ok(Some(Self {
            track,
            prev,
            next,
            step: config.scroll_step,
            tolerance: config.edge_tolerance,
            settle_timers: Vec::new(),
        }))
    }

    pub fn mount(env: &mut BrowserEnv, config: &PageConfig) -> Result<Option<Box<dyn PageScript>>> {
        let Some(mut carousel) = Self::new(&env.dom, &config.carousel)? else {
            return Ok(None);
        };
        env.dom.set_disabled(carousel.prev, true)?;
        carousel.settle_timers = config
            .carousel
            .settle_delays_ms
            .iter()
            .map(|delay| env.set_timeout(*delay))
            .collect();
        Ok(Some(Box::new(carousel)))
    }

    pub fn at_start(&self, dom: &Dom) -> bool {
        dom.scroll_left(self.track) <= self.tolerance
    }

    pub fn at_end(&self, dom: &Dom) -> bool {
        dom.scroll_left(self.track) + dom.client_width(self.track)
            >= dom.scroll_width(self.track) - self.tolerance
    }

    pub fn update_buttons(&self, dom: &mut Dom) -> Result<()> {
        let (at_start, at_end) = (self.at_start(dom), self.at_end(dom));
        trace!(at_start, at_end, "carousel buttons updated");
        dom.set_disabled(self.prev, at_start)?;
        dom.set_disabled(self.next, at_end)
    }
}

impl PageScript for CarouselController {
    fn name(&self) -> &'static str {
        "carousel"
    }

    fn on_event(&mut self, env: &mut BrowserEnv, event: &mut Event) -> Result<()> {
        match event.kind() {
            EventKind::Click => {
                if event.hits(&env.dom, EventKind::Click, Some(self.prev))
                    && !env.dom.disabled(self.prev)
                {
                    env.scroll_element_by(self.track, -self.step)?;
                } else if event.hits(&env.dom, EventKind::Click, Some(self.next))
                    && !env.dom.disabled(self.next)
                {
                    env.scroll_element_by(self.track, self.step)?;
                }
            }
            EventKind::Scroll if event.target() == Some(self.track) => {
                self.update_buttons(&mut env.dom)?;
            }
            EventKind::Resize | EventKind::Load => self.update_buttons(&mut env.dom)?,
            EventKind::Timer => {
                let Some(id) = event.timer_id() else {
                    return Ok(());
                };
                if let Some(position) = self.settle_timers.iter().position(|timer| *timer == id) {
                    self.settle_timers.remove(position);
                    self.update_buttons(&mut env.dom)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
