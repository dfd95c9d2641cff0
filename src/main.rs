use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use listing_query::sources::write_json;
use listing_query::{
    load_checked, query_with, Criteria, HttpSource, JsonFileSource, ListingSource, QueryConfig,
    RawCriteria,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Filter, sort and page property listings
#[derive(Parser, Debug)]
#[command(name = "listing-query", version)]
struct Cli {
    /// JSON file holding an array of listings
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    file: Option<PathBuf>,

    /// REST endpoint returning listings
    #[arg(long)]
    url: Option<String>,

    /// Free text matched against title, address and city
    #[arg(long)]
    search: Option<String>,

    /// rent | sale
    #[arg(long)]
    listing_type: Option<String>,

    /// apartment | house | condo | villa | townhouse | studio | land | commercial
    #[arg(long)]
    property_type: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    featured: Option<bool>,

    #[arg(long)]
    price_min: Option<f64>,

    #[arg(long)]
    price_max: Option<f64>,

    /// createdAt | rentPrice | salePrice
    #[arg(long)]
    sort_by: Option<String>,

    /// asc | desc
    #[arg(long)]
    sort_order: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    offset: Option<i64>,

    /// Only listings created within the configured recency window
    #[arg(long)]
    new: bool,

    /// Print the result as JSON instead of a listing summary
    #[arg(long)]
    json: bool,

    /// Also save the returned page to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn raw_criteria(&self) -> RawCriteria {
        RawCriteria {
            search: self.search.clone(),
            listing_type: self.listing_type.clone(),
            property_type: self.property_type.clone(),
            city: self.city.clone(),
            featured: self.featured,
            price_min: self.price_min,
            price_max: self.price_max,
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }

    fn source(&self) -> Result<Box<dyn ListingSource>> {
        match (&self.file, &self.url) {
            (Some(path), _) => Ok(Box::new(JsonFileSource::new(path.clone()))),
            (None, Some(url)) => Ok(Box::new(HttpSource::new(url.clone())?)),
            (None, None) => anyhow::bail!("either --file or --url is required"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = QueryConfig::from_env()?;
    let criteria = Criteria::try_from(cli.raw_criteria()).context("Invalid query criteria")?;

    let source = cli.source()?;
    info!("Loading listings via {}", source.source_name());
    let mut records = load_checked(source.as_ref(), &config).await?;

    if cli.new {
        let now = Utc::now();
        records.retain(|p| p.is_new(now, config.new_listing_window));
        info!(
            "{} listings created in the last {} days",
            records.len(),
            config.new_listing_window.num_days()
        );
    }

    let result = query_with(&records, &criteria, &config);
    let limit = criteria.limit.unwrap_or(config.default_limit);
    info!(
        "Matched {} of {} listings, showing {} (page {} of {})",
        result.total_count,
        records.len(),
        result.items.len(),
        if limit == 0 { 0 } else { criteria.offset / limit + 1 },
        result.page_count(limit)
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for (i, property) in result.items.iter().enumerate() {
            println!(
                "{}. {} ({} {} {})",
                criteria.offset + i + 1,
                property.title,
                property.authoritative_price(),
                property.currency(),
                property.listing_type()
            );
            println!(
                "   {} bed, {} bath, {} {}",
                property.bedrooms, property.bathrooms, property.area_size, property.area_unit
            );
            match &property.location.neighborhood {
                Some(area) => println!("   {}, {}", area, property.location.city),
                None => println!("   {}", property.location.city),
            }
            println!("   ID: {}", property.id);
            if !property.features.is_empty() {
                println!("   Features: {}", property.features.join(", "));
            }
            println!();
        }
    }

    if let Some(path) = &cli.output {
        write_json(path, &result.items).await?;
    }

    Ok(())
}
