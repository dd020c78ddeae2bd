use std::path::PathBuf;
use std::sync::Arc;

use catalog::{Catalog, JsonFileCatalogStore, SeedCatalogStore};
use clap::{Parser, Subcommand};
use foundation::ids::{AssetId, UserId};
use map::{
    CountBadgeRenderer, GridClusterer, HeadlessMapService, MapLayer, MapOptions, MapStatus,
    sync_session,
};
use query::{FacetKey, Scope, SortBy};
use runtime::{NavCommand, Page};
use serde::Serialize;
use session::{Command, FilterTarget, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "study360", about = "Query the Study360 lesson and map catalog")]
struct Cli {
    /// JSON catalog to load instead of the built-in seed data.
    #[arg(long, env = "STUDY360_CATALOG")]
    catalog: Option<PathBuf>,

    /// Current user, for the Personal scope.
    #[arg(long, env = "STUDY360_USER", default_value = catalog::seed::DEFAULT_USER_ID)]
    user: String,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Search and filter lessons.
    Lessons {
        #[arg(long, short, default_value = "")]
        query: String,
        /// Restrict to the Roman Empire collection.
        #[arg(long)]
        thematic: bool,
        /// Facet selection as key=value (level, language, author). Repeatable.
        #[arg(long = "facet", value_parser = parse_facet)]
        facets: Vec<(FacetKey, String)>,
        #[arg(long, value_parser = parse_sort, default_value = "relevance")]
        sort: SortBy,
        /// Arrive via a tag link: seeds the query with this tag.
        #[arg(long)]
        tag: Option<String>,
    },
    /// Facet groups with counts over the whole catalog.
    Facets,
    /// Filter map assets.
    Assets {
        #[arg(long, short, default_value = "")]
        query: String,
        #[arg(long)]
        thematic: bool,
        #[arg(long, value_parser = parse_scope, default_value = "combined")]
        scope: Scope,
    },
    /// Autocomplete suggestions for a partial query.
    Suggest { query: String },
    /// Map markers (one per location) and their clusters at a zoom level.
    Pins {
        #[arg(long, value_parser = parse_scope, default_value = "combined")]
        scope: Scope,
        #[arg(long, short, default_value = "")]
        query: String,
        /// Assets to mark as selected.
        #[arg(long = "select")]
        selected: Vec<String>,
        #[arg(long)]
        zoom: Option<u8>,
    },
    /// Toggle assets in order and show the resulting selection.
    Select {
        ids: Vec<String>,
        /// Start a lesson draft from the selection.
        #[arg(long)]
        compose: bool,
    },
}

fn parse_sort(s: &str) -> Result<SortBy, String> {
    SortBy::parse(s).ok_or_else(|| format!("unknown sort {s:?} (relevance, rating, favorites, title)"))
}

fn parse_scope(s: &str) -> Result<Scope, String> {
    Scope::parse(s).ok_or_else(|| format!("unknown scope {s:?} (combined, global, personal)"))
}

fn parse_facet(s: &str) -> Result<(FacetKey, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("facet {s:?} must be key=value"))?;
    let key = FacetKey::parse(key).ok_or_else(|| format!("unknown facet {key:?}"))?;
    Ok((key, value.trim().to_string()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(cli: Cli) -> Result<(), String> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(&JsonFileCatalogStore::new(path)),
        None => Catalog::load(&SeedCatalogStore),
    }
    .map_err(|e| e.to_string())?;
    info!(
        lessons = catalog.lessons().len(),
        assets = catalog.assets().len(),
        "catalog loaded"
    );

    let mut session = Session::new(Arc::new(catalog), UserId::new(cli.user.clone()));
    let json = cli.json;

    match cli.cmd {
        Cmd::Lessons {
            query,
            thematic,
            facets,
            sort,
            tag,
        } => {
            session.apply(Command::Navigate(NavCommand::to(Page::Lessons)));
            if !query.is_empty() {
                session.apply(Command::SetQuery(FilterTarget::Lessons, query));
            }
            if let Some(tag) = tag {
                session.apply(Command::Navigate(NavCommand::lessons_tagged(tag)));
            }
            if thematic {
                session.apply(Command::ToggleThematic(FilterTarget::Lessons));
            }
            for (key, value) in facets {
                if !session.apply(Command::ToggleFacet(key, value.clone())) {
                    return Err(format!("no lesson has {}={value}", key.as_str()));
                }
            }
            session.apply(Command::SetSort(sort));

            let lessons = session.lessons();
            if json {
                return print_json(&lessons);
            }
            if lessons.is_empty() {
                println!("no results");
            }
            for l in lessons {
                println!(
                    "{}\t{}\t{}\t{:.1}\t{}\t{}",
                    l.id,
                    l.title,
                    l.author,
                    l.rating,
                    l.favorites,
                    l.tags.join(", ")
                );
            }
        }
        Cmd::Facets => {
            let groups = session.lesson_facets();
            if json {
                return print_json(&groups);
            }
            for g in groups {
                println!("{}:", g.label);
                for o in g.options {
                    println!("  {} ({})", o.value, o.count);
                }
            }
        }
        Cmd::Assets {
            query,
            thematic,
            scope,
        } => {
            apply_map_filters(&mut session, query, thematic, scope);
            let assets = session.assets();
            if json {
                return print_json(&assets);
            }
            if assets.is_empty() {
                println!("no results");
            }
            for a in assets {
                println!("{}\t{}\t{}\t{:?}", a.id, a.title, a.author, a.visibility);
            }
        }
        Cmd::Suggest { query } => {
            let out = session.suggestions(&query);
            if json {
                return print_json(&out);
            }
            for s in out {
                println!("{:?}\t{}\t{}", s.kind, s.value, s.count);
            }
        }
        Cmd::Pins {
            scope,
            query,
            selected,
            zoom,
        } => {
            apply_map_filters(&mut session, query, false, scope);
            session.apply(Command::SelectAll(
                selected.into_iter().map(AssetId::from).collect(),
            ));

            let options = MapOptions {
                zoom: zoom.unwrap_or(MapOptions::default().zoom),
                ..MapOptions::default()
            };
            let mut layer = MapLayer::new(HeadlessMapService::new(), options);
            if let MapStatus::Failed(reason) = layer.initialize().await {
                return Err(reason.clone());
            }
            sync_session(&mut layer, &session).map_err(|e| e.to_string())?;
            let clusters = layer
                .clusters(&GridClusterer::default(), &CountBadgeRenderer)
                .map_err(|e| e.to_string())?;

            if json {
                #[derive(Serialize)]
                struct Pins<'a> {
                    markers: Vec<&'a map::MarkerVisual>,
                    clusters: Vec<&'a map::Cluster>,
                }
                return print_json(&Pins {
                    markers: layer.markers().collect(),
                    clusters: clusters.iter().map(|(c, _)| c).collect(),
                });
            }
            for m in layer.markers() {
                let members: Vec<&str> = m.members.iter().map(AssetId::as_str).collect();
                println!(
                    "{}\t{}{}\t{}",
                    m.key,
                    if m.selected { "*" } else { "" },
                    m.badge_label().map(|b| format!("[{b}]")).unwrap_or_default(),
                    members.join(",")
                );
            }
            println!("clusters at zoom {}:", layer.view().zoom);
            for (c, visual) in &clusters {
                println!(
                    "  {:.4},{:.4}\t{}{}",
                    c.position.lat,
                    c.position.lng,
                    visual.label,
                    if visual.selected { " *" } else { "" }
                );
            }
        }
        Cmd::Select { ids, compose } => {
            session.apply(Command::Navigate(NavCommand::to(Page::Map)));
            for id in ids {
                session.apply(Command::ToggleSelection(AssetId::from(id)));
            }
            let selected: Vec<&str> = session.selection().iter().map(AssetId::as_str).collect();
            if !compose {
                return if json {
                    print_json(&selected)
                } else {
                    println!("{}", selected.join(" "));
                    Ok(())
                };
            }
            session.apply(Command::ComposeFromSelection);
            let draft = session
                .draft()
                .ok_or_else(|| "no draft was started".to_string())?;
            if json {
                return print_json(draft);
            }
            let assets: Vec<&str> = draft.asset_ids.iter().map(AssetId::as_str).collect();
            println!("draft with {} asset(s): {}", assets.len(), assets.join(" "));
            println!("needs a title and {} more tag(s)", draft.missing_tags());
        }
    }
    Ok(())
}

fn apply_map_filters(session: &mut Session, query: String, thematic: bool, scope: Scope) {
    session.apply(Command::Navigate(NavCommand::to(Page::Map)));
    session.apply(Command::SetScope(scope));
    session.apply(Command::SetQuery(FilterTarget::Map, query));
    if thematic {
        session.apply(Command::ToggleThematic(FilterTarget::Map));
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{out}");
    Ok(())
}
