// ABOUTME: Demo application sending one SMS through the operation facade
// ABOUTME: Optionally follows the submit with a query, or sends asynchronously via a listener

use argh::FromArgs;
use smpp_wrapper::datatypes::BindType;
use smpp_wrapper::{
    Address, BindCredentials, BindingManager, EventListener, Message, Operation,
    OperationFacade, OperationKind, OperationProperties, SessionOptions, TcpSession,
};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Send an SMS through an SMSC and report the assigned message id
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the system id
    #[argh(option)]
    system_id: Option<String>,

    /// the password
    #[argh(option)]
    password: Option<String>,

    /// the hostname of IP address of the SMSC (default: localhost)
    #[argh(option)]
    host: Option<String>,

    /// the port to use when connecting to the SMSC (default: 2775)
    #[argh(option, short = 'p')]
    port: Option<u32>,

    /// the message to send
    #[argh(option, short = 'm')]
    message: String,

    /// the recipient telephone number
    #[argh(option, short = 't')]
    to: String,

    /// the telephone number that the message will be from
    #[argh(option, short = 'f')]
    from: String,

    /// query the message state after submitting
    #[argh(switch, short = 'q')]
    query: bool,

    /// submit asynchronously and wait for the response on a listener
    #[argh(switch, short = 'a')]
    asynchronous: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let level = if cli_args.debugging {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let host = cli_args.host.unwrap_or_else(|| "localhost".to_owned());
    let port = cli_args.port.unwrap_or(2775);
    let credentials = BindCredentials::new(
        cli_args.system_id.unwrap_or_default(),
        cli_args.password.unwrap_or_default(),
    );

    let session = TcpSession::connect(format!("{host}:{port}"), SessionOptions::default()).await?;
    let binding = Arc::new(BindingManager::new(credentials, session));
    let facade = OperationFacade::new(Arc::clone(&binding));

    let properties = OperationProperties::builder()
        .source_address(cli_args.from.as_str())
        .destination_addresses([Address::new(cli_args.to)])
        .build();

    let mut submit = Operation::builder()
        .kind(OperationKind::Submit)
        .bind_type(BindType::Transceiver)
        .properties(properties)
        .message(Message::new(cli_args.message));

    let listener = Arc::new(EventListener::with_poll_interval(Duration::from_secs(10)));
    if cli_args.asynchronous {
        submit = submit.asynchronous(true).listener(Arc::clone(&listener));
    }
    let submit = submit.build();

    let message_id = match facade.execute(&submit).await {
        Ok(Some(response)) => response.message_id().map(str::to_owned),
        Ok(None) => match listener.dequeue_response_event().await {
            Some(event) => {
                println!("Response event: {:?}", event.frame());
                None
            }
            None => {
                eprintln!("No response within {:?}", listener.poll_interval());
                None
            }
        },
        Err(e) => {
            eprintln!("Failed to send message: {e}");
            let _ = binding.unbind().await;
            return Err(e.into());
        }
    };

    if let Some(id) = message_id {
        println!("Message sent successfully! Message ID: {id}");

        if cli_args.query {
            submit.set_message_id(id);
            let query = Operation::builder_from(&submit)
                .kind(OperationKind::Query)
                .asynchronous(false)
                .build();
            match facade.execute(&query).await {
                Ok(Some(response)) => println!("Query response: {response:?}"),
                Ok(None) => {}
                Err(e) => eprintln!("Query failed: {e}"),
            }
        }
    }

    if let Err(e) = binding.unbind().await {
        eprintln!("Warning: Unbind failed: {e}");
    }
    Ok(())
}
