//! Tail geometry through the public API.

use comical::tail::arc_frame;
use comical::{Bubble, RenderOptions, Style, Tail, TailContext, TailShape, TailSpec};
use glam::DVec2;

const ROOT: DVec2 = DVec2::ZERO;
const TIP: DVec2 = DVec2::new(100.0, 0.0);

#[test]
fn default_mid_bends_a_tenth_to_the_side() {
    assert_eq!(Bubble::default_mid(ROOT, TIP, None, None), DVec2::new(50.0, -10.0));
}

#[test]
fn arc_tail_keeps_its_width_wherever_the_midpoint_goes() {
    for mid in [
        DVec2::new(50.0, -10.0),
        DVec2::new(10.0, -30.0),
        DVec2::new(90.0, 25.0),
        DVec2::new(50.0, 0.0),
    ] {
        let frame = arc_frame(ROOT, mid, TIP, 20.0);
        assert!((frame.begin.distance(frame.end) - 20.0).abs() < 1e-9, "mid {mid}");
        let to_root = frame.adjusted_mid.distance(ROOT);
        let to_tip = frame.adjusted_mid.distance(TIP);
        assert!((to_root - to_tip).abs() < 1e-6, "mid {mid} not on the bisector");
    }
}

#[test]
fn straight_arc_tail_meets_the_bisector_on_the_line() {
    let frame = arc_frame(ROOT, DVec2::new(50.0, 0.0), TIP, 10.0);
    assert!(frame.adjusted_mid.distance(DVec2::new(50.0, 0.0)) < 1e-9);
}

#[test]
fn style_picks_the_tail_variant() {
    let spec = TailSpec::new(TIP, DVec2::new(50.0, -10.0));
    let kind = |style| Tail::for_spec(&spec, ROOT, style).kind_name();
    assert_eq!(kind(Style::Speech), kind(Style::Shout));
    assert_ne!(kind(Style::Speech), kind(Style::Thought));
    assert_ne!(kind(Style::Speech), kind(Style::Caption));
    assert!(Tail::for_spec(&spec, ROOT, Style::Caption).mid().is_none());
    assert!(Tail::for_spec(&spec, ROOT, Style::Thought).mid().is_some());
}

#[test]
fn thought_chain_grows_toward_the_bubble() {
    let options = RenderOptions::default();
    let content = comical::Rect::new(-10.0, -10.0, 20.0, 20.0);
    let ctx = TailContext::new(&options, content);
    let spec = TailSpec::new(DVec2::new(300.0, 0.0), DVec2::new(150.0, -30.0));
    let Tail::ThoughtTail(tail) = Tail::for_spec(&spec, ROOT, Style::Thought) else {
        panic!("thought style draws a thought tail");
    };
    let chain = tail.chain(&ctx);
    assert!(chain.len() > 2);
    assert!(chain.windows(2).all(|w| w[1].1 >= w[0].1));
    assert!(chain.iter().all(|(c, _)| !content.contains(*c)));
    assert!(chain[0].0.distance(DVec2::new(300.0, 0.0)) < chain[0].1 + 1e-6);
}
