use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use comfy_table::Cell;
use nest::{
    Property, PropertyPatch, PropertyStore, Purpose, SearchQuery, compile_filters, config::NestConfig,
    search::query_string, store::read_seed_file,
};
use serde::Serialize;

use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const SEARCH_EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Filters",
        commands: &[
            "nest search --location Roorkee --category flat     # Flats in Roorkee",
            "nest search --purpose buy --budget 5000000         # For sale, 5L to 50L",
            "nest search --keywords \"2bhk furnished\"            # Any keyword in title/description",
        ],
    },
    ExampleGroup {
        title: "Debugging",
        commands: &["nest search --min-price 1000 --show-query        # Print the RediSearch query too"],
    },
];

pub const SEED_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Seeding",
    commands: &["nest seed data/properties.json                     # Load listings into the store"],
}];

pub const UPDATE_EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Updates",
    commands: &[
        "nest update <ID> --price 15000                     # Change the asking price",
        "nest update <ID> --active false                    # Hide a listing",
    ],
}];

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Exact location
    #[arg(long)]
    pub location: Option<String>,

    /// flat, house, plot, pg, farmhouse, villa, office, shop or other
    #[arg(long)]
    pub category: Option<String>,

    /// buy or rent
    #[arg(long)]
    pub purpose: Option<String>,

    /// Inclusive lower price bound
    #[arg(long)]
    pub min_price: Option<String>,

    /// Inclusive upper price bound
    #[arg(long)]
    pub max_price: Option<String>,

    /// Search between a tenth of the budget and the budget
    #[arg(long)]
    pub budget: Option<String>,

    /// Free text; a listing matches if any word appears in its title or description
    #[arg(long)]
    pub keywords: Option<String>,

    /// Also print the compiled RediSearch query
    #[arg(long)]
    pub show_query: bool,
}

impl SearchArgs {
    fn to_query(&self) -> SearchQuery {
        SearchQuery {
            location: self.location.clone(),
            category: self.category.clone(),
            purpose: self.purpose.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            budget: self.budget.clone(),
            keywords: self.keywords.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Listing id
    pub id: String,

    /// New purpose (buy/sale or rent)
    #[arg(long, value_parser = parse_purpose)]
    pub purpose: Option<Purpose>,

    /// New asking price
    #[arg(long)]
    pub price: Option<f64>,

    /// Show or hide the listing
    #[arg(long)]
    pub active: Option<bool>,
}

fn parse_purpose(raw: &str) -> Result<Purpose, String> {
    Purpose::from_query(raw).map_err(|err| err.to_string())
}

#[derive(Serialize)]
#[serde(transparent)]
struct ListingTable(Vec<Property>);

impl TableDisplay for ListingTable {
    fn to_table(&self, output: &OutputManager) -> comfy_table::Table {
        let mut table = output.create_table();
        output.add_table_header(&mut table, &["ID", "Title", "Category", "Purpose", "Location", "Price", "Listed"]);
        for property in &self.0 {
            table.add_row(vec![
                Cell::new(&property.id),
                Cell::new(&property.title),
                Cell::new(property.category.as_str()),
                Cell::new(property.purpose.as_str()),
                Cell::new(&property.location),
                Cell::new(format_price(property.price)),
                Cell::new(property.created_at.format("%Y-%m-%d").to_string()),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|p| format!("{} {} {}", p.id, p.location, format_price(p.price)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct ListingDetail(Property);

impl TableDisplay for ListingDetail {
    fn to_table(&self, output: &OutputManager) -> comfy_table::Table {
        let p = &self.0;
        let mut table = output.create_table();
        let rows = [
            ("ID", p.id.clone()),
            ("Title", p.title.clone()),
            ("Description", p.description.clone()),
            ("Category", p.category.to_string()),
            ("Purpose", p.purpose.to_string()),
            ("Location", p.location.clone()),
            ("Price", format_price(p.price)),
            ("Images", p.images.join("\n")),
            ("Dealer", p.dealer_id.clone()),
            ("Active", p.is_active.to_string()),
            ("Listed", p.created_at.to_rfc3339()),
        ];
        for (key, value) in rows {
            table.add_row(vec![Cell::new(key), Cell::new(value)]);
        }
        table
    }

    fn to_compact(&self) -> String {
        format!("{} {} {}", self.0.id, self.0.title, format_price(self.0.price))
    }
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("₹{:.0}", price)
    } else {
        format!("₹{:.2}", price)
    }
}

pub async fn handle_search(args: SearchArgs, config: &NestConfig, output: &OutputManager) -> Result<()> {
    let filters = args.to_query().into_filters()?;
    let predicate = compile_filters(&filters);

    if args.show_query {
        output.key_value("Query", &query_string(&predicate));
    }

    let store = config.open_store().await?;
    output.verbose(&format!("searching the {} store", store.backend_name()));
    let result = store.search(&predicate).await?;

    output.display(&ListingTable(result.items))?;
    output.info(&format!("{} listing(s) found", result.total));
    Ok(())
}

pub async fn handle_show(id: String, config: &NestConfig, output: &OutputManager) -> Result<()> {
    let store = config.open_store().await?;
    let property = store
        .get(&id)
        .await?
        .with_context(|| format!("Property {id} not found"))?;
    output.display(&ListingDetail(property))
}

pub async fn handle_seed(file: PathBuf, config: &NestConfig, output: &OutputManager) -> Result<()> {
    let store = config.open_store().await?;
    if !store.is_persistent() {
        output.warning("The memory backend keeps listings only for the life of this process.");
    }

    let records = read_seed_file(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let created = store.seed(records).await?;
    output.success(&format!("Seeded {} listing(s) from {}", created.len(), file.display()));
    Ok(())
}

pub async fn handle_update(args: UpdateArgs, config: &NestConfig, output: &OutputManager) -> Result<()> {
    let patch = PropertyPatch {
        purpose: args.purpose,
        price: args.price,
        is_active: args.active,
    };
    let store = config.open_store().await?;
    require_persistent(&store, "update")?;
    let property = store.update(&args.id, &patch).await?;
    output.success(&format!("Updated {}", property.id));
    output.display(&ListingDetail(property))
}

pub async fn handle_delete(id: String, config: &NestConfig, output: &OutputManager) -> Result<()> {
    let store = config.open_store().await?;
    require_persistent(&store, "delete")?;
    store.delete(&id).await?;
    output.success(&format!("Deleted {id}"));
    Ok(())
}

/// Writes against the memory backend vanish when the command exits.
fn require_persistent(store: &PropertyStore, command: &str) -> Result<()> {
    if !store.is_persistent() {
        bail!(
            "'nest {command}' needs a persistent store, but the {} backend reloads its seed file on every run; \
             set [store] backend = \"redis\"",
            store.backend_name()
        );
    }
    Ok(())
}
