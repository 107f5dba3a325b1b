use crate::{
    core::{geo::Point, map::MapEngine},
    input::events::InputEvent,
    layers::{
        base::OverlaySurface,
        marker::{Marker, MarkerKind},
    },
    rendering::context::{Canvas, DrawCommand},
};
use egui::{Color32, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2, Widget};

/// Paints a [`MapEngine`] and feeds it pointer input.
///
/// Tiles are drawn from their URLs through egui's image loaders, so the app
/// must call `egui_extras::install_image_loaders` once. A tile that fails to
/// load is left to the loader's placeholder.
///
/// ```ignore
/// ui.add(MapWidget::new(&mut engine).attribution("© OpenStreetMap contributors"));
/// ```
pub struct MapWidget<'a> {
    engine: &'a mut MapEngine,
    size: Option<Vec2>,
    interactive: bool,
    show_controls: bool,
    attribution: Option<String>,
}

impl<'a> MapWidget<'a> {
    pub fn new(engine: &'a mut MapEngine) -> Self {
        Self {
            engine,
            size: None,
            interactive: true,
            show_controls: true,
            attribution: Some("© OpenStreetMap contributors".to_string()),
        }
    }

    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn controls(mut self, show: bool) -> Self {
        self.show_controls = show;
        self
    }

    pub fn attribution(mut self, text: impl Into<String>) -> Self {
        self.attribution = Some(text.into());
        self
    }

    pub fn no_attribution(mut self) -> Self {
        self.attribution = None;
        self
    }

    fn forward_input(&mut self, ui: &Ui, response: &Response, rect: Rect) -> bool {
        let local = |pos: Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        let press_origin = ui.input(|i| i.pointer.press_origin()).map(local);
        let mut events = drag_events(
            DragFrame {
                started: response.drag_started(),
                dragged: response.dragged(),
                released: response.drag_released(),
            },
            press_origin,
            response.interact_pointer_pos().map(local),
        );

        if let Some(pos) = response.hover_pos() {
            // egui scrolls up with positive y; wheel events use the opposite sign
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                events.push(InputEvent::Wheel {
                    delta_y: -scroll as f64,
                    position: local(pos),
                });
            }
        }

        let mut changed = false;
        for event in &events {
            changed |= self.engine.handle_input(event) == crate::input::EventHandled::Handled;
        }
        changed
    }

    fn zoom_controls(&mut self, ui: &mut Ui, rect: Rect) -> bool {
        let button = |offset: f32| {
            Rect::from_min_size(rect.right_top() + Vec2::new(-40.0, offset), Vec2::splat(30.0))
        };
        let mut changed = false;
        for (label, control, step) in [("+", button(10.0), 1), ("−", button(45.0), -1)] {
            let response = ui.allocate_rect(control, Sense::click());
            if response.clicked() {
                let zoom = self.engine.zoom() as i32 + step;
                self.engine.set_zoom(zoom);
                changed = true;
            }

            let painter = ui.painter();
            painter.rect_filled(control, 3.0, Color32::from_rgba_unmultiplied(255, 255, 255, 220));
            painter.rect_stroke(control, 3.0, Stroke::new(1.0, Color32::from_gray(100)));
            painter.text(
                control.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(16.0),
                Color32::BLACK,
            );
        }
        changed
    }
}

/// Drag flags egui reports for one frame
#[derive(Debug, Clone, Copy, Default)]
struct DragFrame {
    started: bool,
    dragged: bool,
    released: bool,
}

/// Engine events for one frame of an egui drag.
///
/// egui reports a drag only once the pointer has moved past its threshold,
/// so the press is replayed at `press_origin` followed by a move to the
/// current pointer.
fn drag_events(frame: DragFrame, press_origin: Option<Point>, pointer: Option<Point>) -> Vec<InputEvent> {
    let mut events = Vec::new();
    if let Some(pointer) = pointer {
        if frame.started {
            events.push(InputEvent::MouseDown {
                position: press_origin.unwrap_or(pointer),
            });
            events.push(InputEvent::MouseMove { position: pointer });
        } else if frame.dragged {
            events.push(InputEvent::MouseMove { position: pointer });
        }
    }
    if frame.released {
        events.push(InputEvent::MouseUp);
    }
    events
}

fn to_pos(origin: Pos2, point: Point) -> Pos2 {
    origin + Vec2::new(point.x as f32, point.y as f32)
}

fn paint_canvas(painter: &egui::Painter, origin: Pos2, canvas: &Canvas) {
    for command in canvas.commands() {
        match command {
            DrawCommand::Line { points, style } => {
                let path: Vec<Pos2> = points.iter().map(|p| to_pos(origin, *p)).collect();
                let stroke = Stroke::new(style.width, Color32::from(style.color));
                match style.dash_pattern.as_slice() {
                    [dash, gap, ..] => {
                        painter.extend(Shape::dashed_line(&path, stroke, *dash, *gap));
                    }
                    _ => {
                        painter.add(Shape::line(path, stroke));
                    }
                }
            }
            DrawCommand::Circle {
                center,
                radius,
                style,
            } => {
                painter.circle(
                    to_pos(origin, *center),
                    *radius as f32,
                    Color32::from(style.fill_color),
                    Stroke::new(style.stroke_width, Color32::from(style.stroke_color)),
                );
            }
            DrawCommand::Rect { min, max, style } => {
                painter.rect(
                    Rect::from_min_max(to_pos(origin, *min), to_pos(origin, *max)),
                    0.0,
                    Color32::from(style.fill_color),
                    Stroke::new(style.stroke_width, Color32::from(style.stroke_color)),
                );
            }
        }
    }
}

fn marker_color(kind: MarkerKind) -> Color32 {
    match kind {
        MarkerKind::Job => Color32::from_rgb(220, 60, 40),
        MarkerKind::Store => Color32::from_rgb(240, 170, 30),
        MarkerKind::User => Color32::from_rgb(40, 120, 240),
    }
}

fn paint_markers(painter: &egui::Painter, origin: Pos2, markers: &[Marker]) {
    use crate::core::constants::{MARKER_ICON_ANCHOR, MARKER_ICON_SIZE};

    for marker in markers {
        let Some(element) = marker.element().filter(|e| e.visible) else {
            continue;
        };
        // The anchor sits at the pin's tip
        let tip = to_pos(origin, element.screen);
        let head = tip - Vec2::new(
            0.0,
            MARKER_ICON_ANCHOR.1 as f32 - MARKER_ICON_SIZE.0 as f32 / 2.0,
        );
        let radius = MARKER_ICON_SIZE.0 as f32 / 2.0;
        let color = marker_color(marker.kind);

        painter.line_segment([head, tip], Stroke::new(3.0, color));
        painter.circle(head, radius, color, Stroke::new(1.5, Color32::WHITE));
        painter.circle_filled(head, radius / 3.0, Color32::WHITE);
        painter.text(
            head + Vec2::new(radius + 4.0, 0.0),
            egui::Align2::LEFT_CENTER,
            &marker.label,
            egui::FontId::proportional(12.0),
            Color32::BLACK,
        );
    }
}

impl Widget for MapWidget<'_> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let desired_size = self.size.unwrap_or_else(|| ui.available_size());
        let (rect, mut response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        if !self.engine.is_initialized() {
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Loading map...",
                egui::FontId::proportional(14.0),
                Color32::GRAY,
            );
            return response;
        }

        let size = Point::new(rect.width() as f64, rect.height() as f64);
        if size != self.engine.view().size {
            self.engine.resize(size);
        }

        let mut changed = false;
        if self.interactive {
            changed |= self.forward_input(ui, &response, rect);
        }

        let mut map_ui = ui.child_ui(rect, *ui.layout());
        map_ui.set_clip_rect(rect);
        map_ui.painter().rect_filled(rect, 0.0, Color32::from_gray(220));

        for tile in self.engine.tiles() {
            let tile_rect = Rect::from_min_size(
                to_pos(rect.min, tile.screen),
                Vec2::splat(tile.size as f32),
            );
            egui::Image::new(tile.url.clone()).paint_at(&map_ui, tile_rect);
        }

        let painter = map_ui.painter();
        for overlay in self.engine.overlays().filter(|o| o.is_visible()) {
            match overlay.surface() {
                OverlaySurface::Canvas(canvas) => paint_canvas(painter, rect.min, canvas),
                OverlaySurface::Markers(markers) => paint_markers(painter, rect.min, markers),
            }
        }

        if let Some(text) = &self.attribution {
            painter.text(
                rect.left_bottom() + Vec2::new(5.0, -5.0),
                egui::Align2::LEFT_BOTTOM,
                text,
                egui::FontId::proportional(10.0),
                Color32::from_gray(80),
            );
        }

        if self.show_controls {
            changed |= self.zoom_controls(ui, rect);
        }

        if changed {
            response.mark_changed();
            ui.ctx().request_repaint();
        }
        response
    }
}

pub trait MapWidgetExt {
    fn map_engine(&mut self, engine: &mut MapEngine) -> Response;
}

impl MapWidgetExt for Ui {
    fn map_engine(&mut self, engine: &mut MapEngine) -> Response {
        self.add(MapWidget::new(engine))
    }
}
