use termcap_lean::{Database, locate::search_files};

#[test]
fn resolve_all_system_terminals() {
    for file in search_files() {
        if !file.is_file() {
            continue;
        }
        let database = match Database::open(&file) {
            Ok(database) => database,
            // Some distributions ship files with bytes outside the termcap grammar
            Err(err) => {
                println!("skipping {}: {err}", file.display());
                continue;
            }
        };
        println!("{}:\n{}", file.display(), database.stats());
        for (name, index) in database.names() {
            let name = String::from_utf8_lossy(name);
            assert_eq!(database.entry_index(name.as_bytes()), Some(index));
            match database.resolve(name.as_bytes()) {
                Ok(capabilities) => {
                    println!("terminal: {name}");
                    for capability in capabilities.render() {
                        println!("\t:{capability}:");
                    }
                }
                Err(err) => println!("terminal: {name}: {err}"),
            }
        }
    }
}
