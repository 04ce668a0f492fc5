//! main.rs - Desktop simulator for the dust field
//! Fakes a scrolling page, hit-tests the pointer against it and feeds the
//! resulting events into the field

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use log::info;
use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

use dust_field::{
    Bindings, DustField, ElementId, Event, MotionPreference, PageCanvas, Rect, Region,
    RegionKind, Rgb, Settings, TickOutcome, Viewport,
};

const SCREEN_WIDTH: u32 = 1280;
const SCREEN_HEIGHT: u32 = 720;
const TABLET_WIDTH: f32 = 1100.0;
const PAGE_HEIGHT: f32 = 1500.0;
const SCROLL_STEP: f32 = 48.0;
const PAGE_BACKGROUND: Rgb = Rgb::new(246, 244, 239);

// Hero text, in document coordinates.
const HERO: Rect = Rect::new(80.0, 140.0, 560.0, 90.0);

/// An interactive element of the fake page, in document coordinates.
struct Element {
    id: ElementId,
    kind: RegionKind,
    rect: Rect,
    label: &'static str,
}

fn page_layout() -> Vec<Element> {
    let mut page = vec![Element {
        id: 1,
        kind: RegionKind::GravityWell,
        rect: Rect::new(80.0, 290.0, 180.0, 44.0),
        label: "View projects",
    }];
    for (i, label) in ["Rust", "WebGPU", "Tokio", "Serde", "Embedded", "WASM"]
        .into_iter()
        .enumerate()
    {
        page.push(Element {
            id: 10 + i as ElementId,
            kind: RegionKind::SkillPill,
            rect: Rect::new(80.0 + i as f32 * 130.0, 400.0, 116.0, 30.0),
            label,
        });
    }
    for (i, label) in ["Project A", "Project B", "Project C"].into_iter().enumerate() {
        page.push(Element {
            id: 20 + i as ElementId,
            kind: RegionKind::Repeller,
            rect: Rect::new(80.0 + i as f32 * 380.0, 700.0, 340.0, 220.0),
            label,
        });
    }
    for (i, label) in ["GH", "IN", "X", "@"].into_iter().enumerate() {
        page.push(Element {
            id: 30 + i as ElementId,
            kind: RegionKind::SocialIcon,
            rect: Rect::new(80.0 + i as f32 * 70.0, 1200.0, 48.0, 48.0),
            label,
        });
    }
    page
}

struct UiState {
    preference: MotionPreference,
    system_reduced: bool,
    frozen: bool,
    visible: bool,
    coarse_pointer: bool,
    tablet: bool,
    scroll_y: f32,
    pointer: Option<(f32, f32)>,
    hovered: Option<usize>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            preference: MotionPreference::System,
            system_reduced: false,
            frozen: false,
            visible: true,
            coarse_pointer: false,
            tablet: false,
            scroll_y: 0.0,
            pointer: None,
            hovered: None,
        }
    }
}

impl UiState {
    fn viewport(&self) -> Viewport {
        let width = if self.tablet { TABLET_WIDTH } else { SCREEN_WIDTH as f32 };
        Viewport::new(width, SCREEN_HEIGHT as f32).with_coarse_pointer(self.coarse_pointer)
    }

    fn region(&self, element: &Element) -> Region {
        Region {
            id: element.id,
            kind: element.kind,
            rect: element.rect.offset(0.0, -self.scroll_y),
        }
    }
}

// Re-run hover detection; the page may have moved under a still pointer.
fn update_hover(
    ui: &mut UiState,
    page: &[Element],
    field: &mut DustField,
    bindings: &mut Bindings,
) {
    let hovered = ui.pointer.and_then(|(x, y)| {
        page.iter()
            .position(|e| e.rect.offset(0.0, -ui.scroll_y).contains(x, y))
    });
    if hovered == ui.hovered {
        return;
    }
    if let Some(old) = ui.hovered {
        bindings.dispatch(field, Event::RegionLeft(ui.region(&page[old])));
    }
    if let Some(new) = hovered {
        let reaction = bindings.dispatch(field, Event::RegionEntered(ui.region(&page[new])));
        info!("{} -> {:?}", page[new].label, reaction);
    }
    ui.hovered = hovered;
}

fn scroll_by(
    ui: &mut UiState,
    page: &[Element],
    field: &mut DustField,
    bindings: &mut Bindings,
    delta: f32,
) {
    let max = (PAGE_HEIGHT - SCREEN_HEIGHT as f32).max(0.0);
    ui.scroll_y = (ui.scroll_y + delta).clamp(0.0, max);
    bindings.dispatch(field, Event::Scrolled { offset_y: ui.scroll_y });
    bindings.dispatch(field, Event::HeroTextMoved(Some(HERO.offset(0.0, -ui.scroll_y))));
    update_hover(ui, page, field, bindings);
}

fn render_page(
    display: &mut SimulatorDisplay<Rgb888>,
    page: &[Element],
    ui: &UiState,
    field: &DustField,
) -> Result<(), Box<dyn Error>> {
    let outline = Rgb888::new(120, 120, 130);
    let hover = Rgb888::new(37, 99, 235);
    let text_color = Rgb888::new(30, 30, 36);
    let style = MonoTextStyle::new(&FONT_6X10, text_color);

    let hero = HERO.offset(0.0, -ui.scroll_y);
    Text::with_baseline(
        "HELLO, I'M DUST",
        Point::new(hero.x as i32, (hero.y + hero.height / 2.0) as i32),
        style,
        Baseline::Middle,
    )
    .draw(display)?;

    for (i, element) in page.iter().enumerate() {
        let r = element.rect.offset(0.0, -ui.scroll_y);
        if r.y + r.height < 0.0 || r.y > SCREEN_HEIGHT as f32 {
            continue;
        }
        let color = if ui.hovered == Some(i) { hover } else { outline };
        Rectangle::new(
            Point::new(r.x as i32, r.y as i32),
            Size::new(r.width as u32, r.height as u32),
        )
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(display)?;
        Text::with_baseline(
            element.label,
            Point::new(r.x as i32 + 6, r.y as i32 + 6),
            style,
            Baseline::Top,
        )
        .draw(display)?;
    }

    if ui.tablet {
        Rectangle::new(
            Point::new(TABLET_WIDTH as i32, 0),
            Size::new(SCREEN_WIDTH - TABLET_WIDTH as u32, SCREEN_HEIGHT),
        )
        .into_styled(PrimitiveStyle::with_fill(Rgb888::new(210, 208, 202)))
        .draw(display)?;
    }

    let status = format!(
        "{:?} tier | {} particles | motion {:?} (system reduced: {}) | scroll {:.0}",
        field.quality().tier,
        field.particles().len(),
        ui.preference,
        ui.system_reduced,
        ui.scroll_y
    );
    Text::with_baseline(&status, Point::new(8, 8), style, Baseline::Top).draw(display)?;

    let help_style = MonoTextStyle::new(&FONT_6X10, Rgb888::new(110, 110, 120));
    Text::with_baseline(
        "M: Motion | S: System reduced | F: Freeze | H: Hide | C: Coarse | T: Tablet | Wheel/Up/Down: Scroll | Q: Quit",
        Point::new(8, SCREEN_HEIGHT as i32 - 16),
        help_style,
        Baseline::Top,
    )
    .draw(display)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let page = page_layout();
    let mut ui = UiState::default();
    let mut display = SimulatorDisplay::<Rgb888>::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(1).build();
    let mut window = Window::new("Dust Field", &output_settings);

    let mut field = DustField::new(Settings::default(), ui.viewport())?;
    let mut bindings = Bindings::new();
    bindings.dispatch(&mut field, Event::HeroTextMoved(Some(HERO)));
    field.start();

    let started = Instant::now();
    let frame_duration = Duration::from_secs_f32(1.0 / 60.0);

    println!("=== Dust Field ===");
    println!("Move the pointer over the page elements; scroll with the wheel.");

    'main_loop: loop {
        let frame_start = Instant::now();
        let now_ms = started.elapsed().as_millis() as u64;

        let outcome = {
            let mut canvas = PageCanvas::new(&mut display, PAGE_BACKGROUND);
            field.tick(now_ms, &mut canvas)?
        };
        if let TickOutcome::Stepped { .. } = outcome {
            render_page(&mut display, &page, &ui, &field)?;
        }
        window.update(&display);

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'main_loop,
                SimulatorEvent::MouseMove { point } => {
                    let (x, y) = (point.x as f32, point.y as f32);
                    ui.pointer = Some((x, y));
                    bindings.dispatch(&mut field, Event::PointerMoved { x, y });
                    update_hover(&mut ui, &page, &mut field, &mut bindings);
                }
                SimulatorEvent::MouseWheel { scroll_delta, .. } => {
                    let delta = -scroll_delta.y as f32 * SCROLL_STEP;
                    scroll_by(&mut ui, &page, &mut field, &mut bindings, delta);
                }
                SimulatorEvent::KeyDown { keycode, .. } => {
                    let key = format!("{:?}", keycode).to_lowercase();
                    match key.as_str() {
                        "m" => {
                            ui.preference = ui.preference.next();
                            bindings.dispatch(
                                &mut field,
                                Event::MotionPreferenceChanged {
                                    preference: ui.preference,
                                    system_reduced: ui.system_reduced,
                                },
                            );
                            info!("motion preference: {:?}", ui.preference);
                        }
                        "s" => {
                            ui.system_reduced = !ui.system_reduced;
                            bindings.dispatch(
                                &mut field,
                                Event::MotionPreferenceChanged {
                                    preference: ui.preference,
                                    system_reduced: ui.system_reduced,
                                },
                            );
                            info!("system reduced motion: {}", ui.system_reduced);
                        }
                        "f" => {
                            ui.frozen = !ui.frozen;
                            bindings.dispatch(&mut field, Event::PreviewFreeze { frozen: ui.frozen });
                        }
                        "h" => {
                            ui.visible = !ui.visible;
                            bindings.dispatch(
                                &mut field,
                                Event::VisibilityChanged { visible: ui.visible },
                            );
                        }
                        "c" => {
                            ui.coarse_pointer = !ui.coarse_pointer;
                            bindings.dispatch(&mut field, Event::Resized(ui.viewport()));
                        }
                        "t" => {
                            ui.tablet = !ui.tablet;
                            bindings.dispatch(&mut field, Event::Resized(ui.viewport()));
                        }
                        "up" => scroll_by(&mut ui, &page, &mut field, &mut bindings, -SCROLL_STEP),
                        "down" => scroll_by(&mut ui, &page, &mut field, &mut bindings, SCROLL_STEP),
                        "q" => break 'main_loop,
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    Ok(())
}
