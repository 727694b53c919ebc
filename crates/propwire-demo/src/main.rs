//! Runs the contact page walkthrough and prints the page before and after
//! the change button is clicked.

use std::process::ExitCode;

use propwire_demo::config::DemoConfig;
use propwire_demo::model::Person;
use propwire_demo::page::ContactPage;
use propwire_demo::{logging, person_json};
use propwire_runtime::ObservableRecord;
use tracing::{error, info};

fn main() -> ExitCode {
    let config = DemoConfig::from_env();
    logging::init(config.log_format);
    info!(?config, "starting contact page walkthrough");

    let person = ObservableRecord::with_config(Person::john(), config.record);
    let observer_log = person.subscribe_fn(|src, field| {
        info!(field = ?field, value = %src.get_field(field), "property changed");
    });

    let page = match ContactPage::new(person.clone()) {
        Ok(page) => page,
        Err(err) => {
            error!(%err, "failed to bind contact page");
            return ExitCode::FAILURE;
        }
    };

    println!("-- before --\n{}\n", page.render());
    page.change_button().click();
    println!("-- after clicking '{}' --\n{}", page.change_button().caption(), page.render());

    if config.print_json {
        match person_json(&person) {
            Ok(json) => println!("\n{json}"),
            Err(err) => {
                error!(%err, "failed to serialize person");
                return ExitCode::FAILURE;
            }
        }
    }

    drop(observer_log);
    ExitCode::SUCCESS
}
