// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use chat_directives_engine::{Catalog, PropertySpec, TaskConfig};

#[allow(dead_code)]
pub fn generate_reply(size: usize) -> String {
    let base = "Great, I set that up. /add title='Morning run' time=7\n\
                Here is some prose with a path like /usr/bin and `/code` samples.\n\
                ```\n/add title='hidden'\n```\n\
                suggested: [/reminder set at=8, /reminder clear]\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_prose(size: usize) -> String {
    "Plain text with no directives at all, just words and punctuation.\n".repeat(size)
}

#[allow(dead_code)]
pub fn catalog() -> Catalog {
    Catalog::default()
        .with_task(
            "RoutineAdd",
            TaskConfig::default()
                .with_command("add", "Add a routine")
                .with_property(PropertySpec::required("title"))
                .with_property(PropertySpec::optional("time")),
        )
        .with_task(
            "Reminder",
            TaskConfig::default()
                .with_command("reminder", "Manage reminders")
                .with_actions(["set", "clear"])
                .with_property(PropertySpec::optional("at")),
        )
}
