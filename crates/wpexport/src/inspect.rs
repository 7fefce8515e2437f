use crate::prelude::{println, *};
use crate::summary::{BucketTotals, ItemSummary};
use serde::Serialize;
use std::path::PathBuf;
use wpexport_core::classify::{classify, Classification};
use wpexport_core::paths::Redirect;

#[derive(Debug, clap::Args, Clone)]
pub struct InspectOptions {
    /// WordPress eXtended RSS export to inspect
    #[arg(short, long, env = "WPEXPORT_INPUT", default_value = "wordpress.xml")]
    pub input: PathBuf,

    /// TOML file overriding the site configuration
    #[arg(short, long, env = "WPEXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectOutput {
    pub totals: BucketTotals,
    pub decode_fallbacks: usize,
    pub documents: Vec<ItemSummary>,
    pub redirects: Vec<Redirect>,
    pub oddities: Vec<ItemSummary>,
}

impl InspectOutput {
    fn new(classification: &Classification, decode_fallbacks: usize) -> Self {
        Self {
            totals: BucketTotals::from(classification),
            decode_fallbacks,
            documents: classification.documents().map(ItemSummary::from).collect(),
            redirects: classification.redirects.clone(),
            oddities: classification.oddities.iter().map(ItemSummary::from).collect(),
        }
    }
}

pub fn run(options: InspectOptions, global: crate::Global) -> Result<()> {
    let config = crate::pipeline::load_config(options.config.as_deref())?;
    let xml = crate::pipeline::read_export(&options.input)?;
    let items = crate::pipeline::parse_items(&xml, &config)?;
    let decode_fallbacks = items
        .iter()
        .map(|item| crate::pipeline::decode_errors(item).count())
        .sum();
    let classification = classify(items, &config)?;

    if options.json {
        let output = InspectOutput::new(&classification, decode_fallbacks);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        crate::summary::print_classification(&classification, global.verbose);
    }

    Ok(())
}
