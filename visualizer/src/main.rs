use clap::Parser;
use iced::{
    mouse, time,
    widget::{
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, text, Container,
    },
    Color, Element, Length, Pixels, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use log::info;
use sonarcore::display::{Label, LiveView, NoSignalView, ScopeLayout, Scene, Segment, Tick};
use sonarcore::link::{LinkState, SerialOpener};
use sonarcore::math::ScreenPoint;
use sonarcore::{SonarConfig, SonarSession};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const BG: Color = Color::from_rgb8(0, 0, 0);
const GREEN: Color = Color::from_rgb8(0, 220, 0);
const GREEN_DIM: Color = Color::from_rgb8(0, 140, 0);
const SWEEP: Color = Color::from_rgb8(0, 255, 120);
const RED: Color = Color::from_rgb8(255, 50, 50);

const LABEL_SIZE: f32 = 20.0;
const ALERT_SIZE: f32 = 96.0;

#[derive(Parser)]
#[command(author, version, about = "Operator display for the sonar rangefinder")]
struct Args {
    /// Load the display/link config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Serial port to read from, overriding the config
    #[arg(long)]
    port: Option<String>,
    /// Baud rate, overriding the config
    #[arg(long)]
    baud: Option<u32>,
}

fn load_config(args: &Args) -> Result<SonarConfig, String> {
    let mut config = match args.config.as_ref() {
        Some(path) => SonarConfig::load(path).map_err(|e| e.to_string())?,
        None => SonarConfig::default(),
    };
    if let Some(port) = args.port.clone() {
        config.link.port = port;
    }
    if let Some(baud) = args.baud {
        config.link.baud = baud;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn main() -> iced::Result {
    env_logger::init();
    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            std::process::exit(2);
        }
    };

    iced::application(
        move || Visualizer::boot(config.clone()),
        Visualizer::update,
        Visualizer::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .run()
}

fn application_title(_: &Visualizer) -> String {
    "SONAR".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(FRAME_INTERVAL).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

struct Visualizer {
    session: SonarSession<SerialOpener>,
    layout: ScopeLayout,
    scene: Scene,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
}

impl Visualizer {
    fn boot(config: SonarConfig) -> (Self, Task<Message>) {
        let now = Instant::now();
        info!(
            "opening {} at {} baud",
            config.link.port, config.link.baud
        );
        let layout = ScopeLayout::build(&config.display);
        let session = SonarSession::serial(config, now);
        let scene = session.scene(now);
        (
            Visualizer {
                session,
                layout,
                scene,
                status: "Waiting for sensor...".into(),
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                let now = Instant::now();
                state.session.tick(now);
                state.scene = state.session.scene(now);
                state.status = state.status_line();
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let display = &state.session.config().display;
        let scope = Canvas::new(ScopeView {
            layout: &state.layout,
            scene: &state.scene,
        })
        .width(Length::Fixed(display.width))
        .height(Length::Fixed(display.height));

        let layout = column![scope, text(&state.status).size(14)].spacing(6);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn status_line(&self) -> String {
        let link = self.session.link();
        let metrics = self.session.metrics();
        let state = match link.state() {
            LinkState::Connected => "connected",
            LinkState::Connecting => "connecting",
            LinkState::Disconnected => "disconnected",
        };
        format!(
            "{} {} | readings {} | targets {} | reconnects {} | faults {}",
            link.config().port,
            state,
            metrics.readings,
            self.session.detections().len(),
            metrics.connects.saturating_sub(1),
            metrics.disconnects() + metrics.open_failures
        )
    }
}

impl Drop for Visualizer {
    fn drop(&mut self) {
        self.session.shutdown();
    }
}

struct ScopeView<'a> {
    layout: &'a ScopeLayout,
    scene: &'a Scene,
}

fn point(p: ScreenPoint) -> Point {
    Point::new(p.x, p.y)
}

fn stroke_segment(frame: &mut Frame, segment: &Segment, color: Color, width: f32) {
    frame.stroke(
        &Path::line(point(segment.from), point(segment.to)),
        Stroke::default().with_width(width).with_color(color),
    );
}

/// Canvas text is anchored at its top-left corner; shift it so `anchor` sits
/// roughly at the centre of the string.
fn draw_label(frame: &mut Frame, label: &Label, color: Color, size: f32, center_y: bool) {
    let width = label.text.chars().count() as f32 * size * 0.5;
    let y = if center_y {
        label.anchor.y - size / 2.0
    } else {
        label.anchor.y
    };
    frame.fill_text(canvas::Text {
        content: label.text.clone(),
        position: Point::new(label.anchor.x - width / 2.0, y),
        color,
        size: Pixels(size),
        ..canvas::Text::default()
    });
}

impl ScopeView<'_> {
    fn draw_layout(&self, frame: &mut Frame) {
        for ring in &self.layout.rings {
            let color = if ring.major { GREEN } else { GREEN_DIM };
            let arc = Path::new(|builder| {
                for (i, p) in ring.points.iter().enumerate() {
                    if i == 0 {
                        builder.move_to(point(*p));
                    } else {
                        builder.line_to(point(*p));
                    }
                }
            });
            frame.stroke(&arc, Stroke::default().with_width(4.0).with_color(color));
        }

        stroke_segment(frame, &self.layout.baseline, GREEN, 5.0);

        for tick in &self.layout.distance_ticks {
            self.draw_tick(frame, tick, 3.0, false);
        }
        for segment in &self.layout.grid {
            stroke_segment(frame, segment, GREEN_DIM, 3.0);
        }
        for tick in &self.layout.angle_ticks {
            let width = if tick.major { 4.0 } else { 2.0 };
            self.draw_tick(frame, tick, width, true);
        }
    }

    fn draw_tick(&self, frame: &mut Frame, tick: &Tick, width: f32, center_label: bool) {
        stroke_segment(frame, &tick.segment, GREEN, width);
        if let Some(label) = &tick.label {
            draw_label(frame, label, GREEN, LABEL_SIZE, center_label);
        }
    }

    fn draw_live(&self, frame: &mut Frame, view: &LiveView) {
        self.draw_layout(frame);

        stroke_segment(frame, &view.sweep, SWEEP, view.sweep_width);

        for marker in &view.targets {
            frame.fill(&Path::circle(point(marker.center), marker.radius), RED);
        }

        for step in &view.trail {
            let color = Color {
                a: step.alpha,
                ..SWEEP
            };
            stroke_segment(frame, &step.segment, color, 3.0);
        }
    }

    fn draw_no_signal(&self, frame: &mut Frame, view: &NoSignalView) {
        if !view.message_visible {
            return;
        }
        let label = Label {
            text: view.message.clone(),
            anchor: view.anchor,
        };
        draw_label(frame, &label, RED, ALERT_SIZE, true);
    }
}

impl canvas::Program<Message> for ScopeView<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BG);

        match self.scene {
            Scene::Live(view) => self.draw_live(&mut frame, view),
            Scene::NoSignal(view) => self.draw_no_signal(&mut frame, view),
        }

        vec![frame.into_geometry()]
    }
}
