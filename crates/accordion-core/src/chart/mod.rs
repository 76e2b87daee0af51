//! Gantt chart adapter.
//!
//! Translates the campaign's assets into the node/link schema consumed by a
//! dhtmlx-gantt style component: one `project` node per asset, one child
//! node per scheduled task, and a chain of finish-to-start links between
//! each asset's tasks. The translation is rebuilt in full on every change.
//!
//! The component itself sits behind [`ChartRenderer`]; [`ChartAdapter`]
//! owns one renderer and drives its lifecycle (initialize once, then replace
//! data on every sync).

pub mod json;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::campaign::SelectedAsset;

pub use json::JsonChartRenderer;

/// Link type for finish-to-start dependencies.
pub const FINISH_TO_START: &str = "0";

/// Node type marker for per-asset parent rows.
pub const PROJECT_NODE: &str = "project";

/// One row in the chart: an asset (`project`) or one of its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttNode {
    pub id: u32,
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "gantt_date::option"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
}

impl GanttNode {
    pub fn is_project(&self) -> bool {
        self.node_type.as_deref() == Some(PROJECT_NODE)
    }
}

/// A dependency between two task nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttLink {
    pub id: u32,
    pub source: u32,
    pub target: u32,
    #[serde(rename = "type")]
    pub link_type: String,
}

/// The full input handed to the chart component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttData {
    pub data: Vec<GanttNode>,
    pub links: Vec<GanttLink>,
}

impl GanttData {
    pub fn task_nodes(&self) -> impl Iterator<Item = &GanttNode> {
        self.data.iter().filter(|n| !n.is_project())
    }

    pub fn project_nodes(&self) -> impl Iterator<Item = &GanttNode> {
        self.data.iter().filter(|n| n.is_project())
    }
}

/// Build the node/link set for a list of assets.
///
/// Node ids are sequential from 1 across the whole chart, parents before
/// their children. Link ids are sequential from 1. Fails only when ids no
/// longer fit in a `u32`.
pub fn build_gantt_data(assets: &[SelectedAsset]) -> Result<GanttData, ChartError> {
    let mut data = Vec::new();
    let mut links = Vec::new();
    let mut next_id = 1u32;

    for asset in assets {
        let parent_id = take_id(&mut next_id)?;
        data.push(GanttNode {
            id: parent_id,
            text: asset.label(),
            node_type: Some(PROJECT_NODE.to_owned()),
            open: Some(true),
            start_date: None,
            duration: None,
            parent: None,
        });

        let mut prev: Option<u32> = None;
        for task in &asset.scheduled_tasks {
            let task_id = take_id(&mut next_id)?;
            data.push(GanttNode {
                id: task_id,
                text: task.name.clone(),
                node_type: None,
                open: None,
                start_date: Some(task.start_date),
                duration: Some(task.duration_days),
                parent: Some(parent_id),
            });

            if let Some(source) = prev {
                links.push(GanttLink {
                    id: link_id(links.len())?,
                    source,
                    target: task_id,
                    link_type: FINISH_TO_START.to_owned(),
                });
            }
            prev = Some(task_id);
        }
    }

    Ok(GanttData { data, links })
}

fn take_id(next: &mut u32) -> Result<u32, ChartError> {
    let id = *next;
    *next = next.checked_add(1).ok_or(ChartError::IdOverflow)?;
    Ok(id)
}

fn link_id(existing: usize) -> Result<u32, ChartError> {
    existing
        .checked_add(1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(ChartError::IdOverflow)
}

/// Errors surfaced by a chart renderer.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize chart data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("chart renderer error: {0}")]
    Renderer(String),

    #[error("chart has more rows than fit in a 32-bit id")]
    IdOverflow,
}

/// The external Gantt component, reduced to the two calls the adapter makes.
pub trait ChartRenderer {
    /// Prepare the component. Called once, before the first data load.
    fn init(&mut self) -> Result<(), ChartError>;

    /// Replace everything the component shows with `data`.
    fn replace_data(&mut self, data: &GanttData) -> Result<(), ChartError>;
}

/// Owns one long-lived renderer and feeds it on every change.
#[derive(Debug)]
pub struct ChartAdapter<R> {
    renderer: R,
    initialized: bool,
}

impl<R: ChartRenderer> ChartAdapter<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            initialized: false,
        }
    }

    /// Rebuild the chart input from `assets` and hand it to the renderer,
    /// initializing the renderer first if this is the first sync.
    pub fn sync(&mut self, assets: &[SelectedAsset]) -> Result<(), ChartError> {
        if !self.initialized {
            self.renderer.init()?;
            self.initialized = true;
        }
        let data = build_gantt_data(assets)?;
        debug!(
            nodes = data.data.len(),
            links = data.links.len(),
            "replacing chart data"
        );
        self.renderer.replace_data(&data)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

/// `%d-%m-%Y`, the chart component's default date format.
pub(crate) mod gantt_date {
    pub const FORMAT: &str = "%d-%m-%Y";

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::FORMAT;

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            let s: Option<String> = Option::deserialize(deserializer)?;
            s.map(|s| NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::AssetId;
    use crate::schedule::{AnchorMode, compute_schedule};
    use crate::template::TaskTemplate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn asset(name: &str, platform: &str, start: Option<NaiveDate>) -> SelectedAsset {
        let outcome = compute_schedule(
            start,
            &TaskTemplate::builtin(),
            d(2026, 10, 16),
            AnchorMode::ForwardChaining,
            name,
        );
        SelectedAsset {
            id: AssetId::new(),
            category: "Digital".to_owned(),
            platform: platform.to_owned(),
            asset_name: name.to_owned(),
            anchor_date: start,
            scheduled_tasks: outcome.tasks,
        }
    }

    #[test]
    fn empty_campaign_yields_empty_chart() {
        assert_eq!(build_gantt_data(&[]).unwrap(), GanttData::default());
    }

    #[test]
    fn project_node_per_asset_with_children() {
        let assets = vec![asset("Full Page", "Metro", Some(d(2026, 10, 19)))];
        let data = build_gantt_data(&assets).unwrap();

        assert_eq!(data.data.len(), 5);
        let parent = &data.data[0];
        assert_eq!(parent.id, 1);
        assert_eq!(parent.text, "Full Page (Metro)");
        assert!(parent.is_project());
        assert_eq!(parent.open, Some(true));

        let children: Vec<&GanttNode> = data.task_nodes().collect();
        assert_eq!(children.len(), 4);
        assert!(children.iter().all(|c| c.parent == Some(1)));
        assert_eq!(children[0].text, "Brief & Asset Approval");
        assert_eq!(children[0].start_date, Some(d(2026, 10, 19)));
        assert_eq!(children[0].duration, Some(3));
    }

    #[test]
    fn links_chain_tasks_within_each_asset_only() {
        let assets = vec![
            asset("Full Page", "Metro", Some(d(2026, 10, 19))),
            asset("Banner Ad", "MailPlus App", Some(d(2026, 10, 20))),
        ];
        let data = build_gantt_data(&assets).unwrap();

        // 2 parents + 8 tasks; 3 links per asset.
        assert_eq!(data.data.len(), 10);
        assert_eq!(data.links.len(), 6);

        let pairs: Vec<(u32, u32)> = data.links.iter().map(|l| (l.source, l.target)).collect();
        assert_eq!(
            pairs,
            vec![(2, 3), (3, 4), (4, 5), (7, 8), (8, 9), (9, 10)]
        );
        let ids: Vec<u32> = data.links.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert!(data.links.iter().all(|l| l.link_type == FINISH_TO_START));
    }

    #[test]
    fn unscheduled_asset_has_parent_only() {
        let assets = vec![asset("Full Page", "Metro", None)];
        let data = build_gantt_data(&assets).unwrap();
        assert_eq!(data.data.len(), 1);
        assert!(data.links.is_empty());
    }

    #[test]
    fn serializes_with_component_field_names() {
        let assets = vec![asset("Full Page", "Metro", Some(d(2026, 10, 19)))];
        let json = serde_json::to_value(build_gantt_data(&assets).unwrap()).unwrap();

        assert_eq!(json["data"][0]["type"], "project");
        assert_eq!(json["data"][0]["open"], true);
        assert!(json["data"][0].get("start_date").is_none());
        assert_eq!(json["data"][1]["start_date"], "19-10-2026");
        assert_eq!(json["data"][1]["parent"], 1);
        assert_eq!(json["links"][0]["type"], "0");
    }

    #[test]
    fn ids_past_u32_are_an_error() {
        let mut next = u32::MAX - 1;
        assert_eq!(take_id(&mut next).unwrap(), u32::MAX - 1);
        assert!(matches!(take_id(&mut next), Err(ChartError::IdOverflow)));

        assert_eq!(link_id(0).unwrap(), 1);
        assert!(matches!(link_id(u32::MAX as usize), Err(ChartError::IdOverflow)));
        assert!(matches!(link_id(usize::MAX), Err(ChartError::IdOverflow)));
    }

    #[test]
    fn deserializes_component_dates() {
        let json = r#"{"id":2,"text":"Content Creation","start_date":"22-10-2026","duration":5,"parent":1}"#;
        let node: GanttNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.start_date, Some(d(2026, 10, 22)));
        assert!(!node.is_project());
    }

    #[derive(Default)]
    struct CountingRenderer {
        inits: usize,
        loads: Vec<GanttData>,
    }

    impl ChartRenderer for CountingRenderer {
        fn init(&mut self) -> Result<(), ChartError> {
            self.inits += 1;
            Ok(())
        }

        fn replace_data(&mut self, data: &GanttData) -> Result<(), ChartError> {
            self.loads.push(data.clone());
            Ok(())
        }
    }

    #[test]
    fn adapter_initializes_once_and_replaces_every_time() {
        let mut adapter = ChartAdapter::new(CountingRenderer::default());
        adapter.sync(&[]).unwrap();
        adapter
            .sync(&[asset("Full Page", "Metro", Some(d(2026, 10, 19)))])
            .unwrap();
        adapter.sync(&[]).unwrap();

        let renderer = adapter.into_renderer();
        assert_eq!(renderer.inits, 1);
        assert_eq!(renderer.loads.len(), 3);
        assert_eq!(renderer.loads[1].data.len(), 5);
        assert!(renderer.loads[2].data.is_empty());
    }
}
