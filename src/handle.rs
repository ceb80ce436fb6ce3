//! Drag handles and the per-tail drag state machine.
//!
//! ```text
//! Idle --pointer down on tip--> DragTip   --pointer up--> Idle
//! Idle --pointer down on mid--> DragCurve --pointer up--> Idle
//! ```
//!
//! While dragging, every pointer move updates the bound control point. A
//! midpoint move into another bubble's content box is rejected: the state
//! stays, the point does not move.

use glam::DVec2;

use crate::log::debug;
use crate::render::{ItemStyle, Paint, RenderOptions, Shape};
use crate::tail::{Tail, TailContext, TailShape};

/// Which control point a handle is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Tip,
    Mid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DragTip,
    DragCurve,
}

impl DragState {
    pub fn is_idle(self) -> bool {
        self == DragState::Idle
    }

    /// The handle being dragged, if any.
    pub fn handle(self) -> Option<HandleKind> {
        match self {
            DragState::Idle => None,
            DragState::DragTip => Some(HandleKind::Tip),
            DragState::DragCurve => Some(HandleKind::Mid),
        }
    }
}

impl From<HandleKind> for DragState {
    fn from(kind: HandleKind) -> Self {
        match kind {
            HandleKind::Tip => DragState::DragTip,
            HandleKind::Mid => DragState::DragCurve,
        }
    }
}

/// Result of one pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The control point moved; shapes and spec need rebuilding.
    Moved,
    /// The target is illegal; nothing changed.
    Rejected,
    /// No drag in progress.
    Ignored,
}

pub(crate) fn handle_shape(at: DVec2, options: &RenderOptions) -> Shape {
    Shape::circle(at, options.handle_radius)
}

/// Auto-curve handles are translucent, user-placed ones solid.
pub(crate) fn handle_style(options: &RenderOptions, auto: bool) -> ItemStyle {
    let fill = if auto {
        &options.auto_handle_fill
    } else {
        &options.manual_handle_fill
    };
    ItemStyle::stroked(options.handle_stroke.clone(), 1.0).with_fill(Paint::Solid(fill.clone()))
}

impl Tail {
    /// Bind a drag to `kind`. Fails for a midpoint on a tail without one and
    /// for the tip of a joiner tail.
    pub fn begin_drag(&mut self, kind: HandleKind) -> bool {
        let allowed = match kind {
            HandleKind::Tip => !self.is_joiner(),
            HandleKind::Mid => self.midpoint().is_some(),
        };
        if allowed {
            debug!(?kind, "drag started");
            self.parts_mut().state = kind.into();
        }
        allowed
    }

    pub fn drag_to(&mut self, p: DVec2, ctx: &TailContext<'_>) -> DragOutcome {
        match self.state() {
            DragState::Idle => DragOutcome::Ignored,
            DragState::DragTip => {
                self.adjust_for_changed_tip(p);
                DragOutcome::Moved
            }
            DragState::DragCurve => {
                if ctx.in_obstacle(p) {
                    debug!(x = p.x, y = p.y, "midpoint drag into another bubble rejected");
                    return DragOutcome::Rejected;
                }
                match self.midpoint_mut() {
                    Some(control) => {
                        control.set_manual(p);
                        DragOutcome::Moved
                    }
                    None => DragOutcome::Ignored,
                }
            }
        }
    }

    /// Back to idle. Returns whether a drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        let was = self.state();
        self.parts_mut().state = DragState::Idle;
        if !was.is_idle() {
            debug!(state = ?was, "drag ended");
        }
        !was.is_idle()
    }

    /// Double-click on the midpoint handle: back to the computed midpoint.
    pub fn reset_auto_curve(&mut self, ctx: &TailContext<'_>) -> bool {
        let (root, tip) = (self.root(), self.tip());
        match self.midpoint_mut() {
            Some(control) => {
                control.reset_auto(root, tip, ctx);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::Bubble;
    use crate::spec::{Style, TailSpec};
    use crate::types::Rect;

    fn arc_tail() -> Tail {
        let spec = TailSpec::new(DVec2::new(100.0, 0.0), DVec2::new(50.0, -10.0)).with_auto_curve(true);
        Tail::for_spec(&spec, DVec2::ZERO, Style::Speech)
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let options = RenderOptions::default();
        let ctx = TailContext::new(&options, Rect::new(-5.0, -5.0, 10.0, 10.0));
        let mut tail = arc_tail();
        assert_eq!(tail.drag_to(DVec2::new(1.0, 1.0), &ctx), DragOutcome::Ignored);
        assert_eq!(tail.tip(), DVec2::new(100.0, 0.0));
        assert!(!tail.end_drag());
    }

    #[test]
    fn tip_drag_lifecycle() {
        let options = RenderOptions::default();
        let ctx = TailContext::new(&options, Rect::new(-5.0, -5.0, 10.0, 10.0));
        let mut tail = arc_tail();
        assert!(tail.begin_drag(HandleKind::Tip));
        assert_eq!(tail.state(), DragState::DragTip);
        assert_eq!(tail.drag_to(DVec2::new(120.0, 40.0), &ctx), DragOutcome::Moved);
        assert_eq!(tail.spec().tip(), DVec2::new(120.0, 40.0));
        assert!(tail.end_drag());
        assert_eq!(tail.state(), DragState::Idle);
    }

    #[test]
    fn midpoint_drag_goes_manual() {
        let options = RenderOptions::default();
        let ctx = TailContext::new(&options, Rect::new(-5.0, -5.0, 10.0, 10.0));
        let mut tail = arc_tail();
        assert!(tail.begin_drag(HandleKind::Mid));
        assert_eq!(tail.drag_to(DVec2::new(40.0, 30.0), &ctx), DragOutcome::Moved);
        let spec = tail.spec();
        assert!(!spec.auto_curve);
        assert_eq!(spec.mid(), DVec2::new(40.0, 30.0));
    }

    #[test]
    fn midpoint_drag_into_other_bubble_is_rejected() {
        let options = RenderOptions::default();
        let mut ctx = TailContext::new(&options, Rect::new(-5.0, -5.0, 10.0, 10.0));
        ctx.obstacles.push(Rect::new(30.0, 20.0, 40.0, 40.0));
        let mut tail = arc_tail();
        tail.begin_drag(HandleKind::Mid);
        let before = tail.spec();
        assert_eq!(tail.drag_to(DVec2::new(40.0, 30.0), &ctx), DragOutcome::Rejected);
        assert_eq!(tail.spec(), before);
        assert_eq!(tail.state(), DragState::DragCurve);
    }

    #[test]
    fn double_click_restores_auto_curve() {
        let options = RenderOptions::default();
        let content = Rect::new(-5.0, -5.0, 10.0, 10.0);
        let ctx = TailContext::new(&options, content);
        let mut tail = arc_tail();
        tail.begin_drag(HandleKind::Mid);
        tail.drag_to(DVec2::new(40.0, 30.0), &ctx);
        tail.end_drag();
        assert!(tail.reset_auto_curve(&ctx));
        let spec = tail.spec();
        assert!(spec.auto_curve);
        assert_eq!(
            spec.mid(),
            Bubble::default_mid(DVec2::ZERO, DVec2::new(100.0, 0.0), Some(content.size()), None)
        );
    }

    #[test]
    fn midless_and_joiner_tails_refuse_drags() {
        let spec = TailSpec::new(DVec2::new(100.0, 0.0), DVec2::new(50.0, 0.0));
        let mut line = Tail::for_spec(&spec, DVec2::ZERO, Style::Caption);
        assert!(!line.begin_drag(HandleKind::Mid));
        assert!(line.begin_drag(HandleKind::Tip));

        let mut joiner = Tail::for_spec(&spec.with_joiner(true), DVec2::ZERO, Style::Speech);
        assert!(!joiner.begin_drag(HandleKind::Tip));
        assert!(joiner.state().is_idle());
    }

    #[test]
    fn handle_fill_shows_mode() {
        let options = RenderOptions::default();
        assert_eq!(handle_style(&options, true).fill, Paint::Solid(options.auto_handle_fill.clone()));
        assert_eq!(handle_style(&options, false).fill, Paint::Solid(options.manual_handle_fill.clone()));
    }
}
