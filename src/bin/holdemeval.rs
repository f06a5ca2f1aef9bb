//! Computes exact holdem hand equities for a given set of hands.
//!
//! For example:
//!   holdemeval --hands "AcKh KdTh QhQd" --board 7d8c8sTs
//!
//! The board can be empty (in which case these are preflop equities), or
//! any number of cards up to 5.

use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::debug;

use poker_eval::constants::{RANK_TO_CHAR, SUIT_TO_CHAR};
use poker_eval::{holdem_equities, Card};

#[derive(Parser, Debug)]
#[command(version, about = "Computes exact holdem hand equities for a given set of hands")]
struct Args {
    /// Hands to compare, space separated, like "AcKh KdTh"
    #[arg(long)]
    hands: String,

    /// Board cards to start with, like 7d8c8sTs
    #[arg(long, default_value = "")]
    board: String,
}

fn parse_card(s: &str) -> Result<Card> {
    Card::parse(s).with_context(|| format!("failed to parse card {s:?}"))
}

fn parse_hand(s: &str) -> Result<[Card; 2]> {
    if !s.is_ascii() || s.len() != 4 {
        bail!("expect hand in format like AcKh, got {s:?}");
    }
    Ok([parse_card(&s[..2])?, parse_card(&s[2..])?])
}

fn parse_board(s: &str) -> Result<Vec<Card>> {
    let brd: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if !brd.is_ascii() || brd.len() % 2 != 0 {
        bail!("bad --board flag {s:?}, missing a suit or rank?");
    }
    (0..brd.len()).step_by(2).map(|i| parse_card(&brd[i..i + 2])).collect()
}

fn fmt_hand(h: &[Card; 2]) -> String {
    h.iter()
        .map(|c| {
            format!(
                "{}{}",
                RANK_TO_CHAR[usize::from(c.raw_rank())],
                SUIT_TO_CHAR[c.suit() as usize].to_ascii_lowercase()
            )
        })
        .collect()
}

fn run() -> Result<()> {
    let args = Args::parse();

    let hands = args
        .hands
        .split_whitespace()
        .map(parse_hand)
        .collect::<Result<Vec<_>>>()?;
    if hands.is_empty() {
        bail!("must specify one or more hands via the --hands flag");
    }
    let board = parse_board(&args.board)?;

    let start = Instant::now();
    let eqs = holdem_equities(&hands, &board).context("failed to compute equities")?;
    debug!("enumerated {} runouts in {:?}", eqs[0].boards, start.elapsed());

    println!("{} runouts evaluated", eqs[0].boards);
    for (hand, eq) in hands.iter().zip(&eqs) {
        println!(
            "{}: equity:{:.2}%\twin:{:.2}%\ttie:{:.2}%",
            fmt_hand(hand),
            eq.equity * 100.0,
            eq.win * 100.0,
            eq.tie * 100.0
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
