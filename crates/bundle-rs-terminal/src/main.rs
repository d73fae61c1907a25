use bundle_rs::eligibility::InstalledInfo;
use bundle_rs::install_plan::{plan_install, PlanAction};
use bundle_rs::selection::Selection;
use bundle_rs::sources::{HttpMarketplace, InstalledStateFile, VcsCache};

#[tokio::main]
async fn main() {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",       "Show help");
		opts.optflag( "v", "verbose",    "Increased vebosity");
		opts.optopt(  "c", "config",     "Read config from FILE", "FILE");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: bundle-rs-terminal [options] (resolve <manifest.json> | plan <manifest.json> [positions...])"));
			return;
		}

		parsed_options
	};

	if parsed_options.opt_present("v") {
		env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
	} else {
		env_logger::init();
	}

	let config = match parsed_options.opt_str("c") {
		Some(path) => bundle_rs::Config::load_from_file(path),
		None => bundle_rs::Config::load_from_disk(),
	}.unwrap_or_else(|e| {
		log::warn!("Failed to read config file: {}", e);
		log::warn!("Using default config.");
		bundle_rs::Config::default()
	});

	let (command, manifest_path) = match (parsed_options.free.first(), parsed_options.free.get(1)) {
		(Some(c), Some(p)) => (c.as_str(), p),
		(Some(_), None) => { log::error!("Manifest path not provided."); return },
		(None, _) => { eprintln!("{}", opts.usage("No command given.")); return },
	};

	let result = match command {
		"resolve" => resolve(&config, manifest_path).await.map(|_| ()),
		"plan" => plan(&config, manifest_path, &parsed_options.free[2..]).await,
		other => Err(Error::UnknownCommand(other.to_owned())),
	};

	if let Err(e) = result {
		log::error!("{}", e);
		std::process::exit(1);
	}
}

async fn resolve(config: &bundle_rs::Config, manifest_path: impl AsRef<std::path::Path>) -> Result<bundle_rs::resolver::ResolutionSession<bundle_rs::resolver::Complete>, Error> {
	let manifest = bundle_rs::Manifest::load_from_file(manifest_path)?;
	log::trace!("Resolving {} dependencies", manifest.len());

	let marketplace = HttpMarketplace::new(config)?;
	let vcs = VcsCache::new(config);
	let installed = InstalledStateFile::new(config);

	let session = bundle_rs::resolve_bundle(manifest, config.readiness(), &marketplace, &vcs, &installed, |info: &InstalledInfo| {
		log::debug!("{} of the resolved plugins are installed", info.len());
	}).await.map_err(|session| Error::Incomplete(session.error_indexes().len()))?;

	let eligibility = session.eligibility(config.features());
	let error_indexes = session.error_indexes();
	println!("Resolved dependencies:");
	for (position, dependency) in session.manifest().dependencies().iter().enumerate() {
		match eligibility.plugins().get(position).and_then(Option::as_ref) {
			Some(plugin) => {
				let info = eligibility.version_info(&plugin.identity_key());
				let installed = match info.installed_version {
					Some(v) => format!("installed {}", v),
					None => "not installed".to_owned(),
				};
				let allowed = if eligibility.can_install(position) { "" } else { " [not allowed]" };
				println!("\t{}) {} {} ({}, {}){}", position, plugin.identity_key(), plugin.version, dependency.kind(), installed, allowed);
			},
			None if error_indexes.contains(&position) => println!("\t{}) failed to resolve ({})", position, dependency.kind()),
			None => println!("\t{}) unresolved ({})", position, dependency.kind()),
		}
	}

	Ok(session)
}

async fn plan(config: &bundle_rs::Config, manifest_path: impl AsRef<std::path::Path>, positions: &[String]) -> Result<(), Error> {
	let session = resolve(config, manifest_path).await?;
	let eligibility = session.eligibility(config.features());
	let installable = eligibility.installable_plugins();
	let installable_count = installable.installable_plugins.len();

	let mut selection = Selection::new();
	if positions.is_empty() {
		selection.select_all(installable);
	} else {
		for p in positions {
			let position = p.parse::<usize>().map_err(|_| Error::InvalidPosition(p.clone()))?;
			if !eligibility.can_install(position) {
				log::warn!("Skipping position {}, it cannot be installed", position);
				continue;
			}
			eligibility.handle_select(position, |plugin, position, count| {
				selection.toggle(plugin, position, count);
			});
		}
	}
	log::debug!("Selection is {:?} of {} installable", selection.state(installable_count), installable_count);

	let plan = plan_install(session.manifest(), &selection, session.installed_info())?;
	if plan.entries.is_empty() {
		println!("Nothing selected.");
		return Ok(());
	}

	println!("Install plan:");
	for entry in &plan.entries {
		match &entry.action {
			PlanAction::Install => println!("\tinstall {}", entry.unique_identifier),
			PlanAction::Upgrade { original_unique_identifier } => println!("\tupgrade {} -> {}", original_unique_identifier, entry.unique_identifier),
			PlanAction::AlreadyInstalled => println!("\tkeep {} (already installed)", entry.unique_identifier),
		}
	}
	println!("{} of {} entries need installing.", plan.pending().count(), plan.entries.len());

	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("bundle-rs error: {0}")]
	BundleRsError(#[from] bundle_rs::Error),
	#[error("Unknown command `{0}`")]
	UnknownCommand(String),
	#[error("Invalid position `{0}`")]
	InvalidPosition(String),
	#[error("Resolution did not complete, {0} positions errored")]
	Incomplete(usize),
}
