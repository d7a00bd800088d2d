use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use plc_cluster::InMemoryCluster;
use plc_core::{
    authorize, init_tracing, respond, CoordinatorConfig, LogFormat, ProjectCoordinator,
    Repositories, Response,
};
use plc_model::{NewProject, OwnerId, ProjectPatch, Reference, Service, Session, Volume};
use plc_store::{MemoryStore, ServiceRepository, VolumeRepository};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Command::new("plc")
        .version(plc_core::VERSION)
        .about("Project lifecycle coordinator")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(value_parser!(LogFormat))
                .help("Log output: text or json"),
        )
        .subcommand(
            Command::new("scenario")
                .about("Walk a project through its lifecycle against in-memory backends")
                .arg(
                    Arg::new("volumes")
                        .long("volumes")
                        .default_value("2")
                        .value_parser(value_parser!(usize))
                        .help("Volumes attached before removal"),
                )
                .arg(
                    Arg::new("fail-volume")
                        .long("fail-volume")
                        .value_parser(value_parser!(usize))
                        .help("Make the cluster reject this volume (1-based) on removal"),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Print only the final summary"),
                ),
        )
        .subcommand(Command::new("config").about("Print the effective configuration"));

    let matches = cli.get_matches();

    let format = matches
        .get_one::<LogFormat>("log-format")
        .copied()
        .unwrap_or_default();
    init_tracing(format, "info");

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => CoordinatorConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CoordinatorConfig::default(),
    };

    match matches.subcommand() {
        Some(("scenario", sub)) => run_scenario(config, sub).await,
        Some(("config", _)) => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        _ => Ok(()),
    }
}

async fn run_scenario(config: CoordinatorConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let volume_count = matches.get_one::<usize>("volumes").copied().unwrap_or(2);
    let fail_volume = matches.get_one::<usize>("fail-volume").copied();
    let quiet = matches.get_flag("quiet");

    let store = Arc::new(MemoryStore::new());
    let cluster = Arc::new(InMemoryCluster::new());
    let coordinator =
        ProjectCoordinator::new(config, Repositories::shared(store.clone()), cluster.clone());

    let print = |label: &str, response: &Response| -> anyhow::Result<()> {
        if !quiet {
            println!("{label}: {} {}", response.status, serde_json::to_string(&response.body)?);
        }
        Ok(())
    };

    print("anonymous list", &respond(authorize(None).map(|_| ())))?;

    let session = authorize(Some(Session::new(OwnerId::new(), "alice")))?;
    let project = coordinator
        .create(&session, NewProject::named("web").with_description("storefront"))
        .await
        .context("scenario project could not be created")?;
    print("create web", &respond(Ok(&project)))?;

    let duplicate = coordinator.create(&session, NewProject::named("web")).await;
    print("create web again", &respond(duplicate))?;

    let stranger = Session::new(OwnerId::new(), "mallory");
    let foreign = coordinator.get(&stranger, &Reference::Identifier(project.id)).await;
    print("foreign get", &respond(foreign))?;

    let renamed = coordinator
        .update(&session, &Reference::parse("web"), ProjectPatch::new().with_name("shop"))
        .await;
    print("rename to shop", &respond(renamed))?;

    for n in 1..=volume_count {
        let cluster_name = format!("pv-{n}");
        VolumeRepository::insert(&*store, Volume::new(project.id, cluster_name.clone())).await?;
        cluster.add_persistent_volume(cluster_name.clone());
        if fail_volume == Some(n) {
            cluster.inject_fault(
                plc_cluster::ClusterOp::DeletePersistentVolume,
                Some(&cluster_name),
            );
        }
    }
    ServiceRepository::insert(&*store, Service::new(session.owner, project.id, "frontend"))
        .await?;

    let removed = coordinator
        .remove(&session, &Reference::Identifier(project.id))
        .await;
    print("remove", &respond(removed))?;

    let again = coordinator.remove(&session, &Reference::parse("shop")).await;
    print("remove again", &respond(again))?;

    println!(
        "projects={} volumes={} services={} namespaces={} cluster_calls={}",
        store.project_count(),
        store.volume_count(),
        store.service_count(),
        cluster.namespace_count(),
        cluster.calls().len()
    );
    Ok(())
}
