//! `accordion template` command: show the task template in use.

use accordion_core::TaskTemplate;
use accordion_core::schedule::required_lead_time;

pub fn run_template(template: &TaskTemplate) {
    println!(
        "{:>3}  {:<28} {:<8} {:>5} {:>7}",
        "#", "TASK", "TEAM", "DAYS", "OFFSET"
    );
    println!("{}", "-".repeat(56));
    for item in template {
        println!(
            "{:>3}  {:<28} {:<8} {:>5} {:>7}",
            item.sequence_id, item.name, item.team, item.duration_days, item.lead_offset_days
        );
    }
    println!();
    println!(
        "Required lead time (backward_offset): {} days",
        required_lead_time(template)
    );
}
