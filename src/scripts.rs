//! Page scripts of the park-booking site. Each one is mounted independently
//! and stays dormant on pages that lack its elements.

use std::rc::Rc;

use crate::page::ScriptMount;

pub(crate) mod booking;
pub(crate) mod carousel;
pub(crate) mod contact;
pub(crate) mod gallery;
pub(crate) mod navigation;

/// Mounts for every site script, in initialization order: contact form,
/// carousel, gallery, booking form, anchor navigation.
pub fn site_scripts() -> Vec<ScriptMount> {
    let mounts: [ScriptMount; 5] = [
        Rc::new(contact::ContactFormController::mount),
        Rc::new(carousel::CarouselController::mount),
        Rc::new(gallery::GalleryController::mount),
        Rc::new(booking::BookingDraftController::mount),
        Rc::new(navigation::AnchorScroller::mount),
    ];
    mounts.into()
}
