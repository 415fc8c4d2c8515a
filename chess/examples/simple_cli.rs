// Simple command-line application to play chess

use chessrule::{board::PrettyStyle, Color, Game};
use std::io::{self, BufRead, Write};

fn main() -> io::Result<()> {
    env_logger::init();

    let mut stdin = io::stdin().lock();
    let mut game = Game::new();

    loop {
        println!("{}", game.board().pretty(PrettyStyle::Utf8));
        let side = match game.side() {
            Color::White => "White",
            Color::Black => "Black",
        };
        print!("{} move (e.g. e2e4, \"moves\", \"reset\" or \"quit\"): ", side);
        io::stdout().flush()?;
        let mut s = String::new();
        if stdin.read_line(&mut s)? == 0 {
            break;
        }

        match s.trim() {
            "quit" => break,
            "reset" => game.reset(),
            "moves" => {
                let moves: Vec<_> = game.legal_moves().iter().map(|m| m.to_string()).collect();
                println!("Legal moves: {}", moves.join(" "));
            }
            mv => {
                if let Err(e) = game.make_move_str(mv) {
                    println!("Bad move: {}", e);
                }
            }
        }
        println!();
    }
    Ok(())
}
