use clap::Parser;
use miette::{IntoDiagnostic, Result};
use pix_reconciler::application::engine::{EngineSettings, ReconciliationEngine};
use pix_reconciler::application::registration::RegistrationWorkflow;
use pix_reconciler::config::{
    DEFAULT_FORM_URL, DEFAULT_LEDGER_PATH, DEFAULT_OPERATOR_CONTACT, Settings, env_or,
};
use pix_reconciler::domain::ports::{
    AuditSinkHandle, ColdStorageUploaderHandle, ConfirmationClassifierHandle, LedgerStoreHandle,
    MessagingGatewayHandle, RosterProviderHandle,
};
use pix_reconciler::infrastructure::csv_ledger::CsvLedgerStore;
use pix_reconciler::infrastructure::csv_roster::CsvRosterProvider;
use pix_reconciler::infrastructure::http::classifier::GrokClassifier;
use pix_reconciler::infrastructure::http::drive::DriveUploader;
use pix_reconciler::infrastructure::http::gateway::EvolutionGateway;
use pix_reconciler::infrastructure::http::sheets::{SheetsAuditSink, SheetsRoster};
use pix_reconciler::infrastructure::offline::{LoggingAuditSink, LoggingGateway, SkippingUploader};
use pix_reconciler::interfaces::json::confirmation_reader::ConfirmationReader;
use pix_reconciler::interfaces::json::event_reader::EventReader;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payment events, one JSON object per line ("-" for stdin)
    input: PathBuf,

    /// Path to the ledger CSV file (overrides LEDGER_PATH)
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Run without live collaborators: roster read from --roster,
    /// notifications and audit records written to the log, uploads skipped
    #[arg(long)]
    offline: bool,

    /// Roster CSV file (Nome,Email,WhatsApp,Status,Livro)
    #[arg(long, required_if_eq("offline", "true"))]
    roster: Option<PathBuf>,

    /// Also snapshot the ledger every N seconds while processing
    #[arg(long)]
    backup_interval_secs: Option<u64>,

    /// Inbound messages to run through the registration-confirmation
    /// workflow after the payment events, one JSON object per line
    /// ({"text": ..., "from": ...}); requires live collaborators
    #[arg(long)]
    confirmations: Option<PathBuf>,
}

struct Collaborators {
    roster: RosterProviderHandle,
    gateway: MessagingGatewayHandle,
    uploader: ColdStorageUploaderHandle,
    audit_sink: AuditSinkHandle,
    classifier: Option<ConfirmationClassifierHandle>,
    settings: EngineSettings,
}

fn offline_collaborators(roster_path: PathBuf) -> Collaborators {
    Collaborators {
        roster: Arc::new(CsvRosterProvider::new(roster_path)),
        gateway: Arc::new(LoggingGateway),
        uploader: Arc::new(SkippingUploader),
        audit_sink: Arc::new(LoggingAuditSink),
        classifier: None,
        settings: EngineSettings {
            operator_contact: env_or("OPERATOR_CONTACT", DEFAULT_OPERATOR_CONTACT),
            form_url: env_or("FORM_URL", DEFAULT_FORM_URL),
            backup_folder: String::new(),
        },
    }
}

fn live_collaborators(settings: Settings) -> Collaborators {
    // One HTTP client, constructed here and cloned into each adapter.
    let client = reqwest::Client::new();
    Collaborators {
        roster: Arc::new(SheetsRoster::new(
            client.clone(),
            settings.sheet_id.clone(),
            settings.google_token.clone(),
        )),
        gateway: Arc::new(EvolutionGateway::new(
            client.clone(),
            settings.gateway_url.clone(),
            settings.gateway_api_key.clone(),
        )),
        uploader: Arc::new(DriveUploader::new(client.clone(), settings.google_token.clone())),
        audit_sink: Arc::new(SheetsAuditSink::new(
            client.clone(),
            settings.sheet_id.clone(),
            settings.google_token.clone(),
        )),
        classifier: Some(Arc::new(GrokClassifier::new(
            client,
            settings.classifier_api_key.clone(),
        ))),
        settings: EngineSettings {
            operator_contact: settings.operator_contact,
            form_url: settings.form_url,
            backup_folder: settings.drive_folder_id,
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (collaborators, default_ledger) = if cli.offline {
        let roster_path = cli
            .roster
            .clone()
            .ok_or_else(|| miette::miette!("--roster is required with --offline"))?;
        (offline_collaborators(roster_path), PathBuf::from(DEFAULT_LEDGER_PATH))
    } else {
        let settings = Settings::from_env().into_diagnostic()?;
        let ledger_path = settings.ledger_path.clone();
        (live_collaborators(settings), ledger_path)
    };

    let ledger_path = cli.ledger.clone().unwrap_or(default_ledger);
    let ledger: LedgerStoreHandle =
        Arc::new(CsvLedgerStore::open(&ledger_path).into_diagnostic()?);

    let registration = match (&cli.confirmations, &collaborators.classifier) {
        (Some(_), Some(classifier)) => Some(RegistrationWorkflow::new(
            classifier.clone(),
            collaborators.roster.clone(),
            collaborators.gateway.clone(),
            collaborators.audit_sink.clone(),
            collaborators.settings.operator_contact.clone(),
        )),
        (Some(_), None) => {
            return Err(miette::miette!(
                "--confirmations requires live collaborators (omit --offline)"
            ));
        }
        _ => None,
    };

    let engine = Arc::new(ReconciliationEngine::new(
        collaborators.roster,
        ledger,
        collaborators.uploader,
        collaborators.gateway,
        collaborators.audit_sink,
        collaborators.settings,
    ));

    if let Some(secs) = cli.backup_interval_secs {
        let engine = engine.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(secs));
            interval.tick().await; // the first tick fires immediately
            loop {
                interval.tick().await;
                engine.backup_ledger().await;
            }
        });
    }

    let source: Box<dyn BufRead> = if cli.input.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(&cli.input).into_diagnostic()?))
    };

    for event_result in EventReader::new(source).events() {
        match event_result {
            Ok(event) => {
                let tx = event.transaction_id.clone();
                let outcome = engine.reconcile(event).await;
                println!("{tx}: {outcome}");
            }
            Err(e) => {
                eprintln!("Error reading event: {e}");
            }
        }
    }

    if let (Some(path), Some(workflow)) = (&cli.confirmations, &registration) {
        let source = BufReader::new(File::open(path).into_diagnostic()?);
        for message_result in ConfirmationReader::new(source).messages() {
            match message_result {
                Ok(message) => {
                    let outcome = workflow.confirm(&message.text, &message.from).await;
                    println!("{}: {outcome}", message.from);
                }
                Err(e) => {
                    eprintln!("Error reading confirmation: {e}");
                }
            }
        }
    }

    Ok(())
}
