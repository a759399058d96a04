#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tablestore::{Command, Engine, EngineConfig};

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { values: String },
    Select { columns: String, where_clause: String },
    Update { set: String, where_clause: String },
    Delete { where_clause: String },
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(dir) = tempfile::tempdir() else { return };
    let Ok(mut engine) = Engine::open(EngineConfig::new(dir.path())) else { return };
    let _ = engine.create_database("fuzz");
    let _ = engine.use_database("fuzz");
    let _ = engine.create_table("t", "id INT, name CHAR(10)");

    for op in ops.into_iter().take(50) {
        let command = match op {
            Op::Insert { values } => Command::insert("t", values),
            Op::Select { columns, where_clause } => Command::select("t", columns, where_clause),
            Op::Update { set, where_clause } => Command::Update {
                table: "t".into(),
                set,
                where_clause,
            },
            Op::Delete { where_clause } => Command::Delete {
                table: "t".into(),
                where_clause,
            },
        };
        let _ = engine.execute(command);
    }
});
