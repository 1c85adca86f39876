//! Test doubles shared by the engine's unit tests.

use crate::SharedApplier;
use fade_core::{Rgb, Rgba, Shadow, Variant, WindowContext, WindowSource};
use fade_theme::{Foreground, NativeTheme, PanelStyle, StyleApplier, StyleHandle};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetPanelColor(Rgba),
    ClearPanelColor,
    SetCornerColor(Rgba),
    ClearCornerColor,
    StripBackground,
    RestoreBackground,
    StripStyling,
    RestoreStyling,
    RegisterTextShadow(Shadow),
    AddTextShadow,
    RemoveTextShadow,
    RegisterIconShadow(Shadow),
    AddIconShadow,
    RemoveIconShadow,
    RegisterForeground(Foreground, Rgb, Variant),
    SetForeground(Foreground, Variant),
    RemoveForeground(Foreground, Variant),
}

/// Applier that records every call on top of a real [`PanelStyle`].
struct RecordingApplier {
    style: PanelStyle,
    calls: Vec<Call>,
    fail:  bool,
}

impl RecordingApplier {
    fn registered(&mut self, call: Call, handle: Option<StyleHandle>) -> Option<StyleHandle> {
        self.calls.push(call);
        if self.fail {
            None
        } else {
            handle
        }
    }
}

impl StyleApplier for RecordingApplier {
    fn theme_background(&self) -> Rgba {
        self.style.theme_background()
    }

    fn set_panel_color(&mut self, color: Rgba) {
        self.calls.push(Call::SetPanelColor(color));
        self.style.set_panel_color(color);
    }

    fn clear_panel_color(&mut self) {
        self.calls.push(Call::ClearPanelColor);
        self.style.clear_panel_color();
    }

    fn set_corner_color(&mut self, color: Rgba) {
        self.calls.push(Call::SetCornerColor(color));
        self.style.set_corner_color(color);
    }

    fn clear_corner_color(&mut self) {
        self.calls.push(Call::ClearCornerColor);
        self.style.clear_corner_color();
    }

    fn strip_panel_background(&mut self) {
        self.calls.push(Call::StripBackground);
        self.style.strip_panel_background();
    }

    fn restore_panel_background(&mut self) {
        self.calls.push(Call::RestoreBackground);
        self.style.restore_panel_background();
    }

    fn strip_panel_styling(&mut self) {
        self.calls.push(Call::StripStyling);
        self.style.strip_panel_styling();
    }

    fn restore_panel_styling(&mut self) {
        self.calls.push(Call::RestoreStyling);
        self.style.restore_panel_styling();
    }

    fn register_text_shadow(&mut self, shadow: Shadow) -> Option<StyleHandle> {
        let handle = if self.fail { None } else { self.style.register_text_shadow(shadow) };
        self.registered(Call::RegisterTextShadow(shadow), handle)
    }

    fn add_text_shadow(&mut self) -> bool {
        self.calls.push(Call::AddTextShadow);
        self.style.add_text_shadow()
    }

    fn remove_text_shadow(&mut self) {
        self.calls.push(Call::RemoveTextShadow);
        self.style.remove_text_shadow();
    }

    fn has_text_shadow(&self) -> bool {
        self.style.has_text_shadow()
    }

    fn register_icon_shadow(&mut self, shadow: Shadow) -> Option<StyleHandle> {
        let handle = if self.fail { None } else { self.style.register_icon_shadow(shadow) };
        self.registered(Call::RegisterIconShadow(shadow), handle)
    }

    fn add_icon_shadow(&mut self) -> bool {
        self.calls.push(Call::AddIconShadow);
        self.style.add_icon_shadow()
    }

    fn remove_icon_shadow(&mut self) {
        self.calls.push(Call::RemoveIconShadow);
        self.style.remove_icon_shadow();
    }

    fn has_icon_shadow(&self) -> bool {
        self.style.has_icon_shadow()
    }

    fn register_foreground(
        &mut self,
        target: Foreground,
        color: Rgb,
        variant: Variant,
    ) -> Option<StyleHandle> {
        let handle = if self.fail {
            None
        } else {
            self.style.register_foreground(target, color, variant)
        };
        self.registered(Call::RegisterForeground(target, color, variant), handle)
    }

    fn set_foreground(&mut self, target: Foreground, variant: Variant) -> bool {
        self.calls.push(Call::SetForeground(target, variant));
        self.style.set_foreground(target, variant)
    }

    fn remove_foreground(&mut self, target: Foreground, variant: Variant) {
        self.calls.push(Call::RemoveForeground(target, variant));
        self.style.remove_foreground(target, variant);
    }
}

/// Cloneable handle onto a shared [`RecordingApplier`].
#[derive(Clone)]
pub struct Recorder(Rc<RefCell<RecordingApplier>>);

impl Default for Recorder {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(RecordingApplier {
            style: PanelStyle::new(NativeTheme::default()),
            calls: Vec::new(),
            fail:  false,
        })))
    }
}

impl Recorder {
    pub fn shared(&self) -> SharedApplier {
        self.0.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn fail_registrations(&self) {
        self.0.borrow_mut().fail = true;
    }

    pub fn style(&self) -> PanelStyle {
        self.0.borrow().style.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn last_panel_color(&self) -> Option<Rgba> {
        self.0.borrow().calls.iter().rev().find_map(|c| match c {
            Call::SetPanelColor(color) => Some(*color),
            _ => None,
        })
    }

    pub fn last_corner_color(&self) -> Option<Rgba> {
        self.0.borrow().calls.iter().rev().find_map(|c| match c {
            Call::SetCornerColor(color) => Some(*color),
            _ => None,
        })
    }
}

/// Mutable stand-in for the desktop.
#[derive(Debug, Default)]
pub struct FakeDesktop {
    pub context: WindowContext,
}

impl FakeDesktop {
    pub fn shared(context: WindowContext) -> Rc<RefCell<FakeDesktop>> {
        Rc::new(RefCell::new(Self { context }))
    }
}

impl WindowSource for FakeDesktop {
    fn window_context(&self) -> WindowContext {
        self.context.clone()
    }
}

pub fn window(app_id: &str, title: &str, is_maximized: bool) -> WindowContext {
    WindowContext {
        is_maximized,
        app_id: Some(app_id.to_string()),
        window_title: Some(title.to_string()),
    }
}
