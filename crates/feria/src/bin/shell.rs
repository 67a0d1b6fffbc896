//! Interactive driver for a feria database.
//!
//! Plays the role of the presentation layer: it only reads snapshots and
//! dispatches session operations. State lives under a directory backend, so
//! a day edited here is still there on the next run.

use feria::prelude::*;
use rustyline::{DefaultEditor, error::ReadlineError};
use std::process::ExitCode;

const DEFAULT_DATA_DIR: &str = ".feria";

fn main() -> ExitCode {
    let dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

    let backend = match DirBackend::open(&dir) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("cannot open data dir {dir}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(Db::new(Box::new(backend)));
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("cannot start line editor: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("feria {} — data dir: {dir}", feria::VERSION);
    println!("type 'help' for commands");

    loop {
        match editor.readline("feria> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match dispatch(&mut session, line) {
                    Ok(Outcome::Continue) => {}
                    Ok(Outcome::Quit) => break,
                    Err(e) => println!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline failure: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

enum Outcome {
    Continue,
    Quit,
}

fn dispatch(session: &mut Session, line: &str) -> Result<Outcome, feria::Error> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    match command {
        "help" => help(),
        "quit" | "exit" => return Ok(Outcome::Quit),

        "date" => {
            let Some(date) = rest.first().and_then(|s| Date::parse(s)) else {
                println!("usage: date YYYY-MM-DD");
                return Ok(Outcome::Continue);
            };
            session.change_date(date)?;
            println!("active date: {date}");
        }

        "map" => match session.snapshot() {
            Some(snapshot) => print_map(snapshot),
            None => println!("no active date; use 'date' first"),
        },

        "show" => {
            let Some(id) = parse_id(&rest) else {
                println!("usage: show <id>");
                return Ok(Outcome::Continue);
            };
            match session.snapshot().and_then(|s| s.get(id)) {
                Some(stall) => print_stall(stall),
                None => println!("no such stall on the active date"),
            }
        }

        "assign" => {
            let (Some(id), Some(count)) = (parse_id(&rest), parse_count(&rest)) else {
                println!("usage: assign <id> <count> <vendor name...>");
                return Ok(Outcome::Continue);
            };
            let vendor = rest[2..].join(" ");
            if vendor.is_empty() {
                println!("usage: assign <id> <count> <vendor name...>");
                return Ok(Outcome::Continue);
            }

            let available = session.max_run(id)?;
            if count > available {
                println!("only {available} contiguous stalls available there");
                return Ok(Outcome::Continue);
            }

            session.select(id)?;
            session.edit(DraftField::Status(Status::Occupied))?;
            session.edit(DraftField::VendorName(vendor))?;
            session.choose_group_size(count)?;
            session.save()?;
            println!("assigned");
        }

        "note" => {
            let Some(id) = parse_id(&rest) else {
                println!("usage: note <id> <text...>");
                return Ok(Outcome::Continue);
            };
            session.select(id)?;
            session.edit(DraftField::Notes(rest[1..].join(" ")))?;
            session.save()?;
            println!("noted");
        }

        "fix" | "unfix" | "pay" | "attend" => {
            let Some(id) = parse_id(&rest) else {
                println!("usage: {command} <id>");
                return Ok(Outcome::Continue);
            };
            session.select(id)?;
            let field = match command {
                "fix" => DraftField::IsFixed(true),
                "unfix" => DraftField::IsFixed(false),
                "pay" => DraftField::HasPaid(true),
                _ => DraftField::Attended(true),
            };
            session.edit(field)?;
            session.save()?;
            println!("saved");
        }

        "release" => {
            let Some(id) = parse_id(&rest) else {
                println!("usage: release <id>");
                return Ok(Outcome::Continue);
            };
            session.release(id)?;
            println!("released");
        }

        "max" => {
            let Some(id) = parse_id(&rest) else {
                println!("usage: max <id>");
                return Ok(Outcome::Continue);
            };
            println!("{}", session.max_run(id)?);
        }

        "roster" => {
            let snapshot = session.snapshot();
            match snapshot {
                Some(snapshot) => {
                    let roster = Roster::derive(snapshot);
                    if roster.is_empty() {
                        println!("no fixed vendors");
                    }
                    for entry in roster.iter() {
                        println!(
                            "#{} {} x{}",
                            entry.id, entry.vendor_name, entry.group_size
                        );
                    }
                }
                None => println!("no active date; use 'date' first"),
            }
        }

        "stats" => match session.stats() {
            Some(stats) => {
                println!(
                    "occupied {} | fixed {} | paid {} | attended {} ({}%) | takings ${}",
                    stats.occupied,
                    stats.fixed,
                    stats.paid,
                    stats.attended,
                    stats.attendance_rate(),
                    stats.fees_collected()
                );
            }
            None => println!("no active date; use 'date' first"),
        },

        "dump" => match session.snapshot() {
            Some(snapshot) => match serde_json::to_string_pretty(snapshot) {
                Ok(json) => println!("{json}"),
                Err(e) => println!("cannot render snapshot: {e}"),
            },
            None => println!("no active date; use 'date' first"),
        },

        "reset" => {
            if rest.first() == Some(&"--force") {
                session.reset_all()?;
                println!("all dates and the roster wiped");
            } else {
                println!("this erases every date; repeat as 'reset --force'");
            }
        }

        _ => println!("unknown command '{command}'; type 'help'"),
    }

    Ok(Outcome::Continue)
}

fn parse_id(rest: &[&str]) -> Option<StallId> {
    rest.first().and_then(|s| s.parse().ok())
}

fn parse_count(rest: &[&str]) -> Option<u8> {
    rest.get(1).and_then(|s| s.parse().ok())
}

fn help() {
    println!("date YYYY-MM-DD          activate a date (materializes the day)");
    println!("map                      render the stall map");
    println!("show <id>                one stall in detail");
    println!("assign <id> <n> <name>   occupy a run of n stalls for a vendor");
    println!("note <id> <text>         attach notes to a stall");
    println!("fix/unfix <id>           toggle permanent (fixed) occupancy");
    println!("pay <id>                 mark today's fee as paid");
    println!("attend <id>              mark the vendor as present today");
    println!("release <id>             free a stall or its whole pack");
    println!("max <id>                 largest pack that fits at a stall");
    println!("roster                   list fixed vendors");
    println!("stats                    occupancy/payment/attendance summary");
    println!("dump                     active snapshot as JSON");
    println!("reset --force            wipe every date and the roster");
    println!("quit                     leave");
}

fn print_map(snapshot: &Snapshot) {
    for category in Category::ALL {
        print!("{:<28}", category.row_name());
        for stall in snapshot.iter().filter(|s| s.category == category) {
            let mark = if stall.is_free() {
                '.'
            } else if stall.is_fixed {
                '#'
            } else {
                'o'
            };
            print!("{mark}");
        }
        println!();
    }
    println!(". free   o occupied   # fixed");
}

fn print_stall(stall: &Stall) {
    println!("{} ({}, {})", stall.number, stall.category, stall.row_name);
    if stall.is_free() {
        println!("  free");
        return;
    }
    println!("  vendor:   {}", stall.vendor_name);
    if !stall.description.is_empty() {
        println!("  sells:    {}", stall.description);
    }
    if !stall.notes.is_empty() {
        println!("  notes:    {}", stall.notes);
    }
    if let Some(group_id) = stall.group_id {
        println!("  pack:     x{} ({group_id})", stall.group_size);
    }
    println!(
        "  fixed: {}  paid: {}  attended: {}",
        stall.is_fixed, stall.has_paid, stall.attended
    );
}
