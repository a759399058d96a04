/// Example walking through databases, tables and row edits in tablestore
use tablestore::logging::LogConfig;
use tablestore::{Command, Engine, EngineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = LogConfig::new("warn").init();

    println!("tablestore School Demo");
    println!("======================\n");

    let data_dir = tempfile::tempdir()?;
    let mut engine = Engine::open(EngineConfig::new(data_dir.path()))?;

    // 1. Set up a database and a table
    println!("1. Creating database 'school' and table 'students':\n");
    run(&mut engine, Command::CreateDatabase { name: "school".into() });
    run(&mut engine, Command::UseDatabase { name: "school".into() });
    run(
        &mut engine,
        Command::CreateTable {
            name: "students".into(),
            columns: "id INT, name CHAR(20), age INT".into(),
        },
    );
    run(&mut engine, Command::ShowTables);

    // 2. Insert rows
    println!("2. Inserting students:\n");
    for values in ["1,Alice,20", "2,Bob,25", "3,Carol,31", "4,Dan,19"] {
        run(&mut engine, Command::insert("students", values));
    }

    // 3. Queries
    println!("3. SELECT name, age FROM students WHERE age > 20:\n");
    run(&mut engine, Command::select("students", "name,age", "age > 20"));

    println!("4. SELECT * FROM students WHERE age < 20 OR name = 'Carol':\n");
    run(&mut engine, Command::select("students", "*", "age < 20 OR name = 'Carol'"));

    // 4. Update and delete
    println!("5. UPDATE students SET age = 26 WHERE name = 'Bob':\n");
    run(
        &mut engine,
        Command::Update {
            table: "students".into(),
            set: "age = 26".into(),
            where_clause: "name = 'Bob'".into(),
        },
    );

    println!("6. DELETE FROM students WHERE age < 20:\n");
    run(
        &mut engine,
        Command::Delete {
            table: "students".into(),
            where_clause: "age < 20".into(),
        },
    );
    run(&mut engine, Command::select("students", "*", ""));

    // 5. Errors are reported, not raised
    println!("7. Inserting the wrong number of values:\n");
    run(&mut engine, Command::insert("students", "5,Eve"));

    println!("On disk:");
    let table = data_dir.path().join("school").join("students.table");
    println!("{}", std::fs::read_to_string(table)?);

    run(&mut engine, Command::DropDatabase { name: "school".into() });
    Ok(())
}

fn run(engine: &mut Engine, command: Command) {
    let report = engine.execute(command);
    println!("{}\n", report);
}
