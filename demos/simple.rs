use probetable::{quadratic_probe, Modulo, ProbingTable, TableConfig};

struct Task {
    title: String,
    done: bool,
}

fn main() -> probetable::Result<()> {
    let mut tasks = ProbingTable::new(43, quadratic_probe(Modulo::default()));

    tasks.try_insert(
        101,
        Task {
            title: "Draft agenda".to_string(),
            done: false,
        },
    )?;
    tasks.try_insert(
        201,
        Task {
            title: "Book room".to_string(),
            done: false,
        },
    )?;

    if let Some(task) = tasks.get_mut(&201) {
        task.done = true;
    }

    println!(
        "Task 201 done: {}",
        tasks.get(&201).map_or(false, |task| task.done)
    );
    println!("Deleted 101: {}", tasks.delete(&101));
    println!("Remaining: {:?}", tasks.values().map(|t| &t.title).collect::<Vec<_>>());

    let config = TableConfig::from_env()?;
    let table = config.build::<u64, String>()?;
    println!(
        "Configured table: capacity {}, strategy {:?}",
        table.capacity(),
        config.strategy
    );

    Ok(())
}
