#![forbid(unsafe_code)]

//! The viewer state machine.
//!
//! One algorithm's result set is shown at a time. Selecting another one
//! cancels any fetch still in flight, bumps the generation counter, and
//! starts a new background fetch; a completion carrying a stale
//! generation is dropped on arrival, so a slow old fetch can never
//! overwrite a newer selection. Pan and zoom are pure view state and
//! respond immediately regardless of backend activity.

use std::sync::Arc;
use std::time::Duration;

use bioscatter_client::{
    Algorithm, CancellationSource, ClusterClient, ClusterRequest, FetchError,
};
use bioscatter_core::{Axis, EmptyDataError, LinearScale, Margin, PointSet, ZoomTracker, compute_scale};

use crate::buffer::Buffer;
use crate::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use crate::geometry::Rect;
use crate::runtime::{Cmd, Model};
use crate::widgets::Widget;
use crate::widgets::chart::{ChartLayout, ScatterChart, nearest_point};
use crate::widgets::spinner::Spinner;
use crate::widgets::status::StatusLine;
use crate::widgets::tooltip::Tooltip;

/// Spinner animation interval.
const SPINNER_INTERVAL: Duration = Duration::from_millis(120);
/// Arrow-key pan step, in plot pixels.
const PAN_STEP_X: f64 = 8.0;
const PAN_STEP_Y: f64 = 4.0;
/// Keyboard/wheel zoom step factors.
const ZOOM_IN: f64 = 1.25;
const ZOOM_OUT: f64 = 0.8;
/// Hover hit radius, in plot pixels.
const HOVER_RADIUS: f64 = 3.0;
/// Pixel margin inside the plot surface.
const PLOT_MARGIN: Margin = Margin::new(1.0, 1.0);

/// Messages driving the viewer.
pub enum Msg {
    /// Terminal input or runtime tick.
    Event(Event),
    /// A background fetch finished.
    FetchDone {
        generation: u64,
        algorithm: Algorithm,
        result: Result<Arc<PointSet>, FetchError>,
    },
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

/// What the chart area currently shows.
#[derive(Debug)]
enum Phase {
    /// Nothing selected yet.
    Idle,
    /// A fetch is in flight.
    Loading { algorithm: Algorithm },
    /// A result set is on screen.
    Rendered {
        algorithm: Algorithm,
        points: Arc<PointSet>,
    },
    /// The last fetch failed; the message replaces the chart.
    Failed {
        algorithm: Algorithm,
        message: String,
    },
}

/// The application model.
pub struct ScatterApp {
    client: Arc<ClusterClient>,
    phase: Phase,
    zoom: ZoomTracker,
    /// Hovered cell and the index of the point under it.
    hover: Option<(u16, u16, usize)>,
    /// Last cell of an active left-button drag.
    drag_from: Option<(u16, u16)>,
    spinner_frame: usize,
    generation: u64,
    cancel: Option<CancellationSource>,
    size: (u16, u16),
}

impl ScatterApp {
    /// Viewer over a fetching client.
    pub fn new(client: Arc<ClusterClient>) -> Self {
        Self {
            client,
            phase: Phase::Idle,
            zoom: ZoomTracker::default(),
            hover: None,
            drag_from: None,
            spinner_frame: 0,
            generation: 0,
            cancel: None,
            size: (80, 24),
        }
    }

    /// The chart's cell area: everything between title and status rows.
    fn chart_area(&self) -> Rect {
        let (w, h) = self.size;
        Rect::new(0, 1, w, h.saturating_sub(2))
    }

    /// Effective (zoom-composed) scales for the current result set.
    fn effective_scales(
        &self,
        points: &PointSet,
        layout: &ChartLayout,
    ) -> Result<(LinearScale, LinearScale), EmptyDataError> {
        let base_x = compute_scale(points, Axis::X, layout.pixel_span_x(), PLOT_MARGIN)?;
        let base_y = compute_scale(points, Axis::Y, layout.pixel_span_y(), PLOT_MARGIN)?;
        Ok((
            self.zoom.rescale(&base_x, Axis::X),
            self.zoom.rescale(&base_y, Axis::Y),
        ))
    }

    fn select(&mut self, algorithm: Algorithm) -> Cmd<Msg> {
        match &self.phase {
            Phase::Rendered { algorithm: a, .. } | Phase::Loading { algorithm: a }
                if *a == algorithm =>
            {
                return Cmd::none();
            }
            _ => {}
        }

        if let Some(cancel) = self.cancel.take() {
            tracing::debug!("cancelling superseded fetch");
            cancel.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        let source = CancellationSource::new();
        let token = source.token();
        self.cancel = Some(source);
        self.phase = Phase::Loading { algorithm };
        self.hover = None;
        self.drag_from = None;

        tracing::info!(%algorithm, generation, "selecting clustering");
        let client = Arc::clone(&self.client);
        Cmd::batch(vec![
            Cmd::task(move || {
                let result = client.get_or_fetch(&ClusterRequest::new(algorithm), &token);
                Msg::FetchDone {
                    generation,
                    algorithm,
                    result,
                }
            }),
            Cmd::tick(SPINNER_INTERVAL),
        ])
    }

    fn on_fetch_done(
        &mut self,
        generation: u64,
        algorithm: Algorithm,
        result: Result<Arc<PointSet>, FetchError>,
    ) -> Cmd<Msg> {
        if generation != self.generation {
            tracing::debug!(%algorithm, generation, "dropping stale fetch completion");
            return Cmd::none();
        }
        self.cancel = None;
        match result {
            Ok(points) => {
                tracing::info!(%algorithm, points = points.len(), "showing result set");
                // New data means a fresh view.
                self.zoom.reset();
                self.hover = None;
                self.phase = Phase::Rendered { algorithm, points };
            }
            Err(FetchError::Cancelled { .. }) => {
                // A newer selection owns the screen now.
            }
            Err(err) => {
                tracing::warn!(%err, "fetch failed");
                self.phase = Phase::Failed {
                    algorithm,
                    message: err.to_string(),
                };
            }
        }
        Cmd::none()
    }

    fn on_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if key.ctrl() && key.code == KeyCode::Char('c') {
            return Cmd::quit();
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Escape => Cmd::quit(),
            KeyCode::Char('1') => self.select(Algorithm::KMeans),
            KeyCode::Char('2') => self.select(Algorithm::Dbscan),
            KeyCode::Char('3') => self.select(Algorithm::Hierarchical),
            KeyCode::Char('r') => {
                self.zoom.reset();
                self.hover = None;
                Cmd::none()
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom_at_center(ZOOM_IN),
            KeyCode::Char('-') => self.zoom_at_center(ZOOM_OUT),
            KeyCode::Left => self.pan(PAN_STEP_X, 0.0),
            KeyCode::Right => self.pan(-PAN_STEP_X, 0.0),
            KeyCode::Up => self.pan(0.0, PAN_STEP_Y),
            KeyCode::Down => self.pan(0.0, -PAN_STEP_Y),
            _ => Cmd::none(),
        }
    }

    fn zoom_at_center(&mut self, factor: f64) -> Cmd<Msg> {
        let layout = ChartLayout::new(self.chart_area());
        self.zoom.zoom_about(
            layout.pixel_span_x() / 2.0,
            layout.pixel_span_y() / 2.0,
            factor,
        );
        self.hover = None;
        Cmd::none()
    }

    fn pan(&mut self, dx: f64, dy: f64) -> Cmd<Msg> {
        self.zoom.pan_by(dx, dy);
        self.hover = None;
        Cmd::none()
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> Cmd<Msg> {
        let layout = ChartLayout::new(self.chart_area());
        match mouse.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let factor = if mouse.kind == MouseEventKind::ScrollUp {
                    ZOOM_IN
                } else {
                    ZOOM_OUT
                };
                // Anchor under the cursor; off-plot wheel zooms about center.
                let (ax, ay) = layout.cell_to_pixel(mouse.x, mouse.y).unwrap_or((
                    layout.pixel_span_x() / 2.0,
                    layout.pixel_span_y() / 2.0,
                ));
                self.zoom.zoom_about(ax, ay, factor);
                self.hover = None;
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_from = Some((mouse.x, mouse.y));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((fx, fy)) = self.drag_from {
                    let dx = (mouse.x as f64 - fx as f64) * 2.0;
                    let dy = (mouse.y as f64 - fy as f64) * 4.0;
                    self.zoom.pan_by(dx, dy);
                    self.hover = None;
                }
                self.drag_from = Some((mouse.x, mouse.y));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_from = None;
            }
            MouseEventKind::Moved => self.update_hover(mouse.x, mouse.y, &layout),
            _ => {}
        }
        Cmd::none()
    }

    fn update_hover(&mut self, x: u16, y: u16, layout: &ChartLayout) {
        self.hover = None;
        let Phase::Rendered { points, .. } = &self.phase else {
            return;
        };
        let Some((px, py)) = layout.cell_to_pixel(x, y) else {
            return;
        };
        let Ok((x_scale, y_scale)) = self.effective_scales(points, layout) else {
            return;
        };
        if let Some(index) = nearest_point(points, &x_scale, &y_scale, px, py, HOVER_RADIUS) {
            self.hover = Some((x, y, index));
        }
    }

    fn on_tick(&mut self) -> Cmd<Msg> {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        if matches!(self.phase, Phase::Loading { .. }) {
            Cmd::tick(SPINNER_INTERVAL)
        } else {
            Cmd::none()
        }
    }

    fn render_centered(&self, area: Rect, text: &str, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let width = text.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height / 2;
        buf.set_string(x, y, text, None, false);
    }

    fn render_chart(&self, area: Rect, buf: &mut Buffer) {
        match &self.phase {
            Phase::Idle => {
                self.render_centered(area, "press 1, 2 or 3 to load a clustering", buf);
            }
            Phase::Loading { algorithm } => {
                let label = format!("clustering with {algorithm}...");
                let width = label.chars().count() as u16 + 2;
                let x = area.x + area.width.saturating_sub(width) / 2;
                let y = area.y + area.height / 2;
                Spinner::new(self.spinner_frame)
                    .label(&label)
                    .render(Rect::new(x, y, width, 1), buf);
            }
            Phase::Failed { message, .. } => {
                self.render_centered(area, &format!("error: {message}"), buf);
            }
            Phase::Rendered { points, .. } => {
                let layout = ChartLayout::new(area);
                match self.effective_scales(points, &layout) {
                    Ok((x_scale, y_scale)) => {
                        let highlight = self.hover.map(|(_, _, i)| i);
                        ScatterChart::new(points, &x_scale, &y_scale)
                            .highlight(highlight)
                            .render(area, buf);
                        if let Some((hx, hy, index)) = self.hover
                            && let Some(p) = points.points().get(index)
                        {
                            Tooltip::new(hx, hy, *p).render(area, buf);
                        }
                    }
                    Err(EmptyDataError) => {
                        self.render_centered(area, "backend returned no points", buf);
                    }
                }
            }
        }
    }

    fn status_left(&self) -> String {
        let k = self.zoom.transform().k;
        match &self.phase {
            Phase::Idle => String::from("idle"),
            Phase::Loading { algorithm } => format!("loading {algorithm}"),
            Phase::Rendered { algorithm, points } => {
                format!("{algorithm}: {} points  zoom {k:.2}x", points.len())
            }
            Phase::Failed { algorithm, .. } => format!("{algorithm}: failed"),
        }
    }
}

impl Model for ScatterApp {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        // Start on k-means, matching the original default selection.
        self.select(Algorithm::KMeans)
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(Event::Key(key)) => self.on_key(key),
            Msg::Event(Event::Mouse(mouse)) => self.on_mouse(mouse),
            Msg::Event(Event::Resize { width, height }) => {
                self.size = (width, height);
                self.hover = None;
                Cmd::none()
            }
            Msg::Event(Event::Tick) => self.on_tick(),
            Msg::FetchDone {
                generation,
                algorithm,
                result,
            } => self.on_fetch_done(generation, algorithm, result),
        }
    }

    fn view(&self, buf: &mut Buffer) {
        let (w, h) = (buf.width(), buf.height());
        if w == 0 || h == 0 {
            return;
        }
        buf.set_string(1, 0, "bioscatter", None, true);

        self.render_chart(self.chart_area(), buf);

        let status = StatusLine::new()
            .left(self.status_left())
            // Reserved blend control; not wired up yet.
            .left("blend off")
            .key_hint("1", "k-means")
            .key_hint("2", "DBSCAN")
            .key_hint("3", "hierarchical")
            .key_hint("r", "reset view")
            .key_hint("q", "quit");
        status.render(Rect::new(0, h - 1, w, 1), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioscatter_client::{CacheStore, ClusterBackend, MemoryCache};
    use bioscatter_core::Point;

    struct StaticBackend(PointSet);

    impl ClusterBackend for StaticBackend {
        fn fetch(&self, _request: &ClusterRequest) -> Result<PointSet, FetchError> {
            Ok(self.0.clone())
        }
    }

    fn sample_points() -> PointSet {
        PointSet::from(vec![Point::new(0.0, 0.0, 0), Point::new(10.0, 10.0, 1)])
    }

    fn app() -> ScatterApp {
        let backend: Arc<dyn ClusterBackend> = Arc::new(StaticBackend(sample_points()));
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
        ScatterApp::new(Arc::new(ClusterClient::new(backend, cache)))
    }

    fn key(c: char) -> Msg {
        Msg::Event(Event::Key(KeyEvent::new(KeyCode::Char(c))))
    }

    fn done(app: &ScatterApp, algorithm: Algorithm, points: PointSet) -> Msg {
        Msg::FetchDone {
            generation: app.generation,
            algorithm,
            result: Ok(Arc::new(points)),
        }
    }

    #[test]
    fn selecting_enters_loading() {
        let mut app = app();
        app.update(key('2'));
        assert!(matches!(
            app.phase,
            Phase::Loading {
                algorithm: Algorithm::Dbscan
            }
        ));
    }

    #[test]
    fn completion_renders_and_resets_zoom() {
        let mut app = app();
        app.update(key('1'));
        app.zoom.pan_by(10.0, 10.0);
        let msg = done(&app, Algorithm::KMeans, sample_points());
        app.update(msg);
        assert!(matches!(app.phase, Phase::Rendered { .. }));
        assert!(app.zoom.transform().is_identity());
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut app = app();
        app.update(key('1'));
        let stale = Msg::FetchDone {
            generation: app.generation,
            algorithm: Algorithm::KMeans,
            result: Ok(Arc::new(sample_points())),
        };
        app.update(key('2'));
        app.update(stale);
        assert!(matches!(
            app.phase,
            Phase::Loading {
                algorithm: Algorithm::Dbscan
            }
        ));
    }

    #[test]
    fn reselecting_current_algorithm_is_a_no_op() {
        let mut app = app();
        app.update(key('1'));
        let generation = app.generation;
        app.update(key('1'));
        assert_eq!(app.generation, generation);
    }

    #[test]
    fn failure_shows_error_state() {
        let mut app = app();
        app.update(key('3'));
        let msg = Msg::FetchDone {
            generation: app.generation,
            algorithm: Algorithm::Hierarchical,
            result: Err(FetchError::Http {
                algorithm: Algorithm::Hierarchical,
                status: 500,
            }),
        };
        app.update(msg);
        let Phase::Failed { message, .. } = &app.phase else {
            panic!("expected failed phase");
        };
        assert!(message.contains("500"));
    }

    #[test]
    fn cancelled_completion_keeps_current_phase() {
        let mut app = app();
        app.update(key('1'));
        app.update(key('2'));
        let msg = Msg::FetchDone {
            generation: app.generation,
            algorithm: Algorithm::Dbscan,
            result: Err(FetchError::Cancelled {
                algorithm: Algorithm::Dbscan,
            }),
        };
        app.update(msg);
        assert!(matches!(app.phase, Phase::Loading { .. }));
    }

    #[test]
    fn superseding_selection_cancels_previous_fetch() {
        let mut app = app();
        app.update(key('1'));
        let token = app.cancel.as_ref().unwrap().token();
        app.update(key('2'));
        assert!(token.is_cancelled());
    }

    #[test]
    fn zoom_keys_scale_and_reset() {
        let mut app = app();
        app.update(key('+'));
        assert!(app.zoom.transform().k > 1.0);
        app.update(key('r'));
        assert!(app.zoom.transform().is_identity());
    }

    #[test]
    fn wheel_zoom_is_clamped() {
        let mut app = app();
        for _ in 0..50 {
            app.update(Msg::Event(Event::Mouse(MouseEvent {
                kind: MouseEventKind::ScrollUp,
                x: 40,
                y: 12,
            })));
        }
        assert_eq!(app.zoom.transform().k, app.zoom.bounds().max_scale);
    }

    #[test]
    fn arrows_pan_the_view() {
        let mut app = app();
        app.update(Msg::Event(Event::Key(KeyEvent::new(KeyCode::Left))));
        app.update(Msg::Event(Event::Key(KeyEvent::new(KeyCode::Up))));
        let t = app.zoom.transform();
        assert_eq!(t.tx, PAN_STEP_X);
        assert_eq!(t.ty, PAN_STEP_Y);
    }

    #[test]
    fn hover_finds_point_under_cursor() {
        let mut app = app();
        app.update(Msg::Event(Event::Resize {
            width: 80,
            height: 24,
        }));
        app.update(key('1'));
        let msg = done(&app, Algorithm::KMeans, sample_points());
        app.update(msg);

        let layout = ChartLayout::new(app.chart_area());
        let Phase::Rendered { points, .. } = &app.phase else {
            panic!("expected rendered phase");
        };
        let points = Arc::clone(points);
        let (x_scale, y_scale) = app.effective_scales(&points, &layout).unwrap();
        let (cx, cy) = layout
            .pixel_to_cell(
                x_scale.position(points.points()[0].x),
                y_scale.position(points.points()[0].y),
            )
            .unwrap();

        app.update(Msg::Event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            x: cx,
            y: cy,
        })));
        assert_eq!(app.hover.map(|(_, _, i)| i), Some(0));

        // Off-plot movement clears the hover.
        app.update(Msg::Event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            x: 0,
            y: 0,
        })));
        assert_eq!(app.hover, None);
    }

    #[test]
    fn quit_keys_quit() {
        let mut app = app();
        assert!(matches!(app.update(key('q')), Cmd::Quit));
        let ctrl_c = Msg::Event(Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: crate::event::Modifiers::CTRL,
        }));
        assert!(matches!(app.update(ctrl_c), Cmd::Quit));
    }

    #[test]
    fn drag_pans_by_cell_delta() {
        let mut app = app();
        app.update(Msg::Event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            x: 20,
            y: 10,
        })));
        app.update(Msg::Event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            x: 23,
            y: 9,
        })));
        let t = app.zoom.transform();
        assert_eq!(t.tx, 6.0);
        assert_eq!(t.ty, -4.0);
    }

    #[test]
    fn empty_result_renders_placeholder_not_panic() {
        let mut app = app();
        app.update(Msg::Event(Event::Resize {
            width: 80,
            height: 24,
        }));
        app.update(key('1'));
        let msg = done(&app, Algorithm::KMeans, PointSet::new());
        app.update(msg);
        let mut buf = Buffer::new(80, 24);
        app.view(&mut buf);
        let mid: String = (0..80)
            .filter_map(|x| buf.get(x, 12).map(|c| c.symbol))
            .collect();
        assert!(mid.contains("no points"));
    }
}
