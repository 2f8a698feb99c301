use crate::Result;
use crate::config::PageConfig;
use crate::event::{Event, EventKind, PageScript, TimerId};
use crate::page::BrowserEnv;

/// Scrolls the contact section into view shortly after load when the page
/// was opened at its anchor.
#[derive(Debug)]
pub struct AnchorScroller {
    anchor: String,
    timer: TimerId,
}

impl AnchorScroller {
    pub fn mount(env: &mut BrowserEnv, config: &PageConfig) -> Result<Option<Box<dyn PageScript>>> {
        let anchor = config.navigation.contact_anchor.clone();
        if env.location().hash() != format!("#{anchor}") {
            return Ok(None);
        }
        let timer = env.set_timeout(config.navigation.scroll_delay_ms);
        Ok(Some(Box::new(Self { anchor, timer })))
    }
}

impl PageScript for AnchorScroller {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn on_event(&mut self, env: &mut BrowserEnv, event: &mut Event) -> Result<()> {
        if event.kind() != EventKind::Timer || event.timer_id() != Some(self.timer) {
            return Ok(());
        }
        // Looked up when the timer fires; the section may render late.
        if let Some(section) = env.dom().by_id(&self.anchor) {
            env.scroll_into_view(section, true);
        }
        Ok(())
    }
}
