//! Fetches a PennKey-protected page, answering the login forms from the terminal.
//!
//! ```sh
//! PENNKEY_URL=https://canvas.upenn.edu/ PENNKEY_COOKIES=~/.cache/pennkey.json \
//!     cargo run --example pennkey_login
//! ```

// std
use std::{
	env,
	io::{self, BufRead, Write},
};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use pennkey_weblogin::{
	auth::{Credentials, SecondFactor},
	config::Config,
	flows::WebLogin,
	http::PendingRequest,
	url::Url,
};

fn ask(label: &str) -> String {
	let mut line = String::new();

	print!("{label}: ");

	if io::stdout().flush().is_err() || io::stdin().lock().read_line(&mut line).is_err() {
		return String::new();
	}

	line.trim().to_owned()
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let target = env::var("PENNKEY_URL").map_err(|_| eyre!("Set PENNKEY_URL to a protected page."))?;
	let mut config = Config::default()
		.with_credential_prompt(|| Credentials::new(ask("PennKey"), ask("Password")))
		.with_second_factor_prompt(|| {
			let token = ask("Two-step code");
			let trust = ask("Trust this device? [y/N]");

			SecondFactor::new(token, trust.eq_ignore_ascii_case("y"))
		});

	if let Ok(path) = env::var("PENNKEY_COOKIES") {
		config = config.with_cookie_file(path);
	}

	let login = WebLogin::new(config)?;
	let response = login.execute(PendingRequest::get(Url::parse(&target)?)).await?;

	println!("{} {}", response.status(), response.url());

	Ok(())
}
