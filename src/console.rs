//! Line-driven front end standing in for the browser widgets, and a map view that logs
//! what it would draw.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::{
    api::{ClickHandler, MapView},
    engine::{helpers, Engine, Event, NoticeLevel},
    entities::{Coordinate, PathHandle, PathStyle, TravelMode},
    error::{invalid_input_error, validation_error, Error},
};

/// Hands console `click` commands to whatever handler the engine registered on the map.
#[derive(Clone, Default)]
pub struct ClickInjector {
    handler: Arc<Mutex<Option<ClickHandler>>>,
}

impl ClickInjector {
    pub fn click(&self, coordinate: Coordinate) -> bool {
        match self.handler.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(handler) => {
                    handler(coordinate);
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }
}

/// `MapView` without a screen: every primitive becomes a log line.
pub struct LogMapView {
    next_handle: u64,
    clicks: ClickInjector,
}

impl LogMapView {
    pub fn new() -> (Self, ClickInjector) {
        let clicks = ClickInjector::default();
        (
            Self {
                next_handle: 0,
                clicks: clicks.clone(),
            },
            clicks,
        )
    }
}

impl MapView for LogMapView {
    fn initialize(&mut self, center: Coordinate, zoom: u8) {
        tracing::info!(zoom, "map centered on {}", center.fallback_label());
    }

    fn set_marker(&mut self, coordinate: Coordinate, label: &str) {
        tracing::info!("marker {:?} at {}", label, coordinate.fallback_label());
    }

    fn draw_path(&mut self, coordinates: &[Coordinate], style: &PathStyle) -> PathHandle {
        self.next_handle += 1;
        tracing::info!(
            handle = self.next_handle,
            points = coordinates.len(),
            color = %style.color,
            dashed = style.dashed,
            "path drawn"
        );
        PathHandle(self.next_handle)
    }

    fn remove_path(&mut self, handle: PathHandle) {
        tracing::info!(handle = handle.0, "path removed");
    }

    fn fit_to_bounds(&mut self, coordinates: &[Coordinate], padding: u32) {
        if let Some(rect) = helpers::bounding_rect(coordinates) {
            tracing::info!(
                padding,
                "view fitted to ({:.4}, {:.4})..({:.4}, {:.4})",
                rect.min().y,
                rect.min().x,
                rect.max().y,
                rect.max().x
            );
        }
    }

    fn on_click(&mut self, handler: ClickHandler) {
        if let Ok(mut slot) = self.clicks.handler.lock() {
            *slot = Some(handler);
        }
    }

    fn teardown(&mut self) {
        if let Ok(mut slot) = self.clicks.handler.lock() {
            *slot = None;
        }
        tracing::info!("map torn down");
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Help,
    Where,
    Destination(String),
    Pick(usize),
    Plan(Option<TravelMode>),
    Mode(TravelMode),
    NewRoute,
    Click(Coordinate),
    Name(String),
    Describe(String),
    Save,
    Cancel,
    Routes,
    Show(usize),
    Rate { route: usize, stars: u8 },
    Online(bool),
    Quit,
}

pub const HELP: &str = "\
commands:
  where                 show your position and address
  to <text>             type a destination (shows suggestions)
  pick <n>              choose suggestion n
  plan [car|bike|foot]  plan a route to the destination
  mode <car|bike|foot>  switch travel mode
  new                   start sketching a community route
  click <lon,lat>       click the map
  name <text>           name the route being sketched
  describe <text>       describe the route being sketched
  save | cancel         finish or discard the sketch
  routes                list community routes
  show <n>              draw community route n
  rate <n> <1-5>        rate community route n
  online | offline      toggle the connectivity indicator
  quit";

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "where" => Self::Where,
            "to" => Self::Destination(rest.to_string()),
            "pick" => Self::Pick(index(rest)?),
            "plan" if rest.is_empty() => Self::Plan(None),
            "plan" => Self::Plan(Some(rest.parse()?)),
            "mode" => Self::Mode(rest.parse()?),
            "new" => Self::NewRoute,
            "click" => Self::Click(rest.parse()?),
            "name" => Self::Name(rest.to_string()),
            "describe" => Self::Describe(rest.to_string()),
            "save" => Self::Save,
            "cancel" => Self::Cancel,
            "routes" => Self::Routes,
            "show" => Self::Show(index(rest)?),
            "rate" => {
                let (route, stars) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| validation_error("usage: rate <n> <1-5>"))?;
                Self::Rate {
                    route: index(route)?,
                    stars: stars
                        .trim()
                        .parse()
                        .map_err(|_| validation_error("stars must be a number from 1 to 5"))?,
                }
            }
            "online" => Self::Online(true),
            "offline" => Self::Online(false),
            "quit" | "exit" => Self::Quit,
            _ => return Err(validation_error(format!("unknown command {:?}, try help", word))),
        };

        Ok(command)
    }
}

/// 1-based list position to 0-based index.
fn index(raw: &str) -> Result<usize, Error> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(validation_error(format!("expected a list number, got {:?}", raw))),
    }
}

/// Runs one command against the engine and returns the lines to print.
pub async fn execute(
    engine: &Engine,
    clicks: &ClickInjector,
    command: Command,
) -> Result<Vec<String>, Error> {
    let lines = match command {
        Command::Help => vec![HELP.to_string()],
        Command::Quit => Vec::new(),
        Command::Where => {
            let position = engine.position().await;
            match position.display_address() {
                Some(address) => vec![format!("you are at {}", address)],
                None if position.loading => vec!["locating...".into()],
                None => vec!["location unavailable".into()],
            }
        }
        Command::Destination(text) => {
            engine.set_destination(&text).await;
            engine
                .suggestions()
                .await
                .iter()
                .enumerate()
                .map(|(i, place)| format!("  {}. {}", i + 1, place.display_name))
                .collect()
        }
        Command::Pick(i) => {
            let place = engine.select_suggestion(i).await?;
            vec![format!("destination: {}", place.display_name)]
        }
        Command::Plan(mode) => {
            let estimate = engine.plan_route(mode).await?;
            duration_table(engine.selected_mode().await, |m| estimate.duration(m))
        }
        Command::Mode(mode) => match engine.select_mode(mode).await? {
            Some(estimate) => duration_table(mode, |m| estimate.duration(m)),
            None => vec![format!("mode set to {}", mode)],
        },
        Command::NewRoute => {
            engine.start_authoring().await;
            vec!["click the map to add points, then name and save".into()]
        }
        Command::Click(coordinate) => {
            if !clicks.click(coordinate) {
                return Err(validation_error("the map is not ready"));
            }
            engine.pump_clicks().await;
            match engine.draft().await {
                Some(draft) => vec![format!("{} points", draft.coordinates.len())],
                None => Vec::new(),
            }
        }
        Command::Name(name) => {
            engine.set_draft_name(&name).await?;
            Vec::new()
        }
        Command::Describe(description) => {
            engine.set_draft_description(&description).await?;
            Vec::new()
        }
        Command::Save => {
            let route = engine.save_draft().await?;
            vec![format!("saved {} ({} points)", route.name, route.coordinates.len())]
        }
        Command::Cancel => {
            engine.cancel_authoring().await;
            engine.cancel_rating().await;
            Vec::new()
        }
        Command::Routes => {
            let routes = engine.community_routes().await;
            if routes.is_empty() {
                vec!["no community routes yet".into()]
            } else {
                routes
                    .iter()
                    .enumerate()
                    .map(|(i, summary)| {
                        format!(
                            "  {}. {} [{}] {}",
                            i + 1,
                            summary.route.name,
                            summary.rating_label,
                            summary.route.description
                        )
                    })
                    .collect()
            }
        }
        Command::Show(i) => {
            let id = route_id(engine, i).await?;
            let route = engine.show_community_route(id).await?;
            vec![format!("showing {}", route.name)]
        }
        Command::Rate { route, stars } => {
            let id = route_id(engine, route).await?;
            engine.open_rating(id).await?;
            if let Err(err) = engine.select_rating(stars).await {
                engine.cancel_rating().await;
                return Err(err);
            }
            let rated = engine.submit_rating().await?;
            vec![format!(
                "{} is now rated {}",
                rated.name,
                helpers::rating_label(&rated)
            )]
        }
        Command::Online(online) => {
            engine.set_online(online).await;
            vec![if online { "online" } else { "offline" }.into()]
        }
    };

    Ok(lines)
}

async fn route_id(engine: &Engine, index: usize) -> Result<uuid::Uuid, Error> {
    engine
        .community_routes()
        .await
        .get(index)
        .map(|summary| summary.route.id)
        .ok_or_else(invalid_input_error)
}

fn duration_table(selected: TravelMode, duration: impl Fn(TravelMode) -> Option<f64>) -> Vec<String> {
    TravelMode::ALL
        .iter()
        .map(|mode| {
            let marker = if *mode == selected { "*" } else { " " };
            format!(
                "{} {:<5} {}",
                marker,
                mode.name(),
                helpers::format_duration(duration(*mode))
            )
        })
        .collect()
}

/// Event lines worth showing; everything else is already visible through command output.
pub fn render_event(event: &Event) -> Option<String> {
    match event {
        Event::Notice(notice) => {
            let prefix = match notice.level {
                NoticeLevel::Info => "info",
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            Some(format!("[{}] {}", prefix, notice.message))
        }
        Event::AddressResolved(address) => Some(format!("you are at {}", address)),
        Event::ConnectivityChanged(false) => Some("[offline]".into()),
        _ => None,
    }
}
