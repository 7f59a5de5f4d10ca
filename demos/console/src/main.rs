use std::sync::Arc;

use cardroom::prelude::*;
use cardroom::protocol::Status;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Console commands
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Line {
    Click(usize),
    Drop(usize, ZoneRef),
    MovePile(ZoneRef, ZoneRef),
    Reorder(usize, usize),
    Command(Command),
    Start(Variant),
    Say(String),
    Leave,
    Help,
}

const HELP: &str = "\
click N            select/deselect the card at hand position N
drop N ZONE[:ID]   drag hand card N onto a zone (discard, center, meld:0, player:2, corner:corner_1)
pile ZONE:ID ZONE:ID  move one board pile onto another
move N M           rearrange your hand
draw [discard]     draw from the deck (or discard pile)
knock | end | challenge | snap | spoon | bid N
start VARIANT      start a game (snap, go_fish, bluff, scat, rummy, kings_corner, spades, spoons)
say TEXT           chat
leave";

fn parse_zone(s: &str) -> Result<ZoneRef, String> {
    match s.split_once(':') {
        Some((kind, id)) => Ok(ZoneRef::with_id(kind.parse()?, id)),
        None => Ok(ZoneRef::new(s.parse()?)),
    }
}

fn parse_index(s: Option<&str>) -> Result<usize, String> {
    let s = s.ok_or("missing card position")?;
    s.parse().map_err(|_| format!("not a position: {s}"))
}

fn parse_line(line: &str) -> Result<Line, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Line::Help);
    };
    let line = match verb {
        "click" => Line::Click(parse_index(words.next())?),
        "drop" => {
            let pos = parse_index(words.next())?;
            let zone = parse_zone(words.next().ok_or("missing zone")?)?;
            Line::Drop(pos, zone)
        }
        "pile" => {
            let from = parse_zone(words.next().ok_or("missing source pile")?)?;
            let to = parse_zone(words.next().ok_or("missing target pile")?)?;
            Line::MovePile(from, to)
        }
        "move" => Line::Reorder(parse_index(words.next())?, parse_index(words.next())?),
        "draw" => Line::Command(Command::Draw {
            from_discard: words.next() == Some("discard"),
        }),
        "knock" => Line::Command(Command::Knock),
        "end" => Line::Command(Command::EndTurn),
        "challenge" => Line::Command(Command::Challenge),
        "snap" => Line::Command(Command::Snap),
        "spoon" => Line::Command(Command::GrabSpoon),
        "bid" => {
            let bid = words.next().ok_or("missing bid")?;
            Line::Command(Command::Bid(
                bid.parse().map_err(|_| format!("not a bid: {bid}"))?,
            ))
        }
        "start" => Line::Start(words.next().ok_or("missing variant")?.parse()?),
        "say" => Line::Say(words.collect::<Vec<_>>().join(" ")),
        "leave" | "quit" => Line::Leave,
        "help" => Line::Help,
        other => return Err(format!("unknown command: {other} (try help)")),
    };
    Ok(line)
}

async fn dispatch(handle: &SessionHandle, line: Line) -> Result<(), CardroomError> {
    match line {
        Line::Click(pos) => handle.gesture(Gesture::click(Place::Hand(pos))).await,
        Line::Drop(pos, zone) => {
            handle
                .gesture(Gesture::drop(Place::Hand(pos), Place::Zone(zone)))
                .await
        }
        Line::MovePile(from, to) => {
            handle
                .gesture(Gesture::drop(Place::Zone(from), Place::Zone(to)))
                .await
        }
        Line::Reorder(from, to) => {
            handle
                .gesture(Gesture::drop(Place::Hand(from), Place::Hand(to)))
                .await
        }
        Line::Command(command) => handle.command(command).await,
        Line::Start(variant) => handle.start_game(variant).await,
        Line::Say(text) => handle.chat(text).await,
        Line::Leave => handle.leave().await,
        Line::Help => {
            println!("{HELP}");
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(view: &ViewSnapshot, me: &PlayerId) {
    let Some(state) = &view.state else {
        println!("[{}] waiting for state", view.connection);
        return;
    };
    let variant = state.variant.map_or("lobby", |v| v.as_str());
    let turn = match (&state.current_player, view.is_local_turn) {
        (_, true) => "your turn".to_string(),
        (Some(p), false) => format!("{p}'s turn"),
        (None, false) => "no turn".to_string(),
    };
    println!("[{variant} | {} | {turn}]", state.status);

    for player in state.players.values() {
        if &player.id != me {
            let name = player.name.as_deref().unwrap_or("?");
            println!("  {name} ({}): {} cards", player.id, player.hand_size);
        }
    }

    let hand = state.hand_of(me);
    let cards: Vec<String> = view
        .hand_order
        .arrange(hand)
        .into_iter()
        .enumerate()
        .map(|(pos, (index, card))| {
            let mark = if view.selection.contains(index) { "*" } else { "" };
            format!("{pos}:{}{mark}", card.key())
        })
        .collect();
    println!("  hand: {}", cards.join(" "));

    if state.status == Status::Over {
        if let Some(winner) = state.outcome.as_ref().and_then(|o| o.winner.as_ref()) {
            println!("  winner: {}", winner.username.as_deref().unwrap_or(winner.id.as_str()));
        }
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn usage() -> ! {
    eprintln!("usage: cardroom-console ROOM PLAYER [VARIANT]");
    eprintln!("env: CARDROOM_SERVER (ws url), CARDROOM_HTTP (http url), CARDROOM_BINDING=http");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cardroom=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(room), Some(player)) = (args.next(), args.next()) else {
        usage();
    };
    let mut params = SessionParams::new(room, player);
    if let Some(variant) = args.next() {
        params = params.with_variant(variant.parse()?);
    }

    let mut config = ClientConfig::default();
    if let Ok(url) = std::env::var("CARDROOM_SERVER") {
        config = config.with_server_url(url);
    }
    if let Ok(url) = std::env::var("CARDROOM_HTTP") {
        config = config.with_http_url(url);
    }
    if std::env::var("CARDROOM_BINDING").is_ok_and(|b| b == "http") {
        config = config.with_action_binding(ActionBinding::Http);
    }

    let home = Arc::new(Notify::new());
    let navigator = {
        let home = Arc::clone(&home);
        move |reason: &str| {
            println!("back to the lobby: {reason}");
            home.notify_one();
        }
    };

    let me = params.player_id.clone();
    let (handle, mut events) = Session::start(config, params, WebSocketConnector, navigator)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::View(view)) => render(&view, &me),
                Some(SessionEvent::Notices(notices)) => {
                    for notice in notices {
                        println!("  ! {}", notice.text);
                    }
                }
                None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    handle.leave().await?;
                    continue;
                };
                match parse_line(&line) {
                    Ok(parsed) => dispatch(&handle, parsed).await?,
                    Err(e) => println!("{e}"),
                }
            }
            () = home.notified() => break,
        }
    }

    tracing::info!("console exiting");
    Ok(())
}
