//! `accordion schedule` command: generate and print a campaign timeline.

use accordion_core::{CampaignState, CampaignStore, SelectedAsset};

/// Generate the timeline for a loaded store and print it.
pub fn run_schedule(name: Option<&str>, store: &mut CampaignStore) {
    let mode = store.mode();
    let today = store.today();
    let state = store.generate_schedule();

    if let Some(name) = name {
        println!("Campaign: {name}");
    }
    println!("Mode: {mode}  Today: {today}");
    println!();

    print_timeline(state);
    print_conflicts(state);
}

fn print_timeline(state: &CampaignState) {
    if state.selected_assets.is_empty() {
        println!("No assets selected.");
        return;
    }

    for asset in &state.selected_assets {
        print_asset(asset);
        println!();
    }
}

fn print_asset(asset: &SelectedAsset) {
    match asset.anchor_date {
        Some(date) => println!("{} [{}]  date {date}", asset.label(), asset.category),
        None => println!("{} [{}]  no date set", asset.label(), asset.category),
    }

    if asset.scheduled_tasks.is_empty() {
        return;
    }

    println!(
        "  {:>2}  {:<28} {:<8} {:<10}  {:<10}  {:>4}",
        "#", "TASK", "TEAM", "START", "END", "DAYS"
    );
    for task in &asset.scheduled_tasks {
        println!(
            "  {:>2}  {:<28} {:<8} {:<10}  {:<10}  {:>4}",
            task.sequence_id,
            task.name,
            task.team,
            task.start_date,
            task.end_date,
            task.duration_days
        );
    }
}

fn print_conflicts(state: &CampaignState) {
    if state.conflicts.is_empty() {
        println!("No conflicts.");
        return;
    }

    println!("Conflicts ({}):", state.conflicts.len());
    for conflict in &state.conflicts {
        println!("  [!] {conflict}");
    }
}
