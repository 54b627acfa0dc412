use std::{env, error::Error, io, io::Write};

use termcap_lean::{Database, StringArea, Termcap, locate::locate, tputs};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let term_name = env::args()
        .nth(1)
        .map_or_else(|| env::var("TERM"), Ok)?;
    let termcap_file = locate()?;
    let database = Database::open(&termcap_file)?;
    println!("{}", database.stats());

    let capabilities = database.resolve(&term_name)?;
    println!("{term_name}:");
    for capability in capabilities.render() {
        println!("\t:{capability}:");
    }

    let mut termcap = Termcap::from(database);
    termcap.tgetent(&term_name)?;
    let mut area = StringArea::new();
    let Some(cm) = termcap.tgetstr("cm", Some(&mut area)) else {
        println!("Your terminal has no cursor motion capability");
        return Ok(());
    };
    let motion = termcap.tgoto(cm, 10, 5)?;
    println!("cm at column 10, row 5: {:?}", String::from_utf8_lossy(&motion));

    let mut stdout = io::stdout();
    let mut output = vec![];
    tputs(&motion, 1, |byte| output.push(byte));
    stdout.write_all(&output)?;
    stdout.write_all(b"here\n")?;

    Ok(())
}
