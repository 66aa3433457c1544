mod input;
mod run;

use anyhow::Context;

use opinia_auth::VerifiedCredential;
use opinia_config::AuthMethod;
use opinia_core::CurriculumYear;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SurveyArgs;
use crate::commands::shared::secret::read_secret;
use crate::context::AppContext;

use self::run::{EventSink, SurveyEvent, run_loop};

/// Handle `opn survey`.
pub async fn handle(args: &SurveyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let resolver = ctx.resolver()?;
    let (credential, enrolled) = authenticate(args, ctx).await?;
    let identifier = resolver.resolve(&credential.subject)?;

    let requested = args.year.map(CurriculumYear::new).transpose()?;
    let year = match (ctx.survey.stored_year(&identifier)?, requested) {
        (_, Some(year)) | (Some(year), None) => year,
        (None, None) => anyhow::bail!("first visit: pass --year with your curriculum year (2019-2022)"),
    };

    let mut session = ctx
        .survey
        .open_session(&identifier, year)
        .context("failed to open survey session")?;
    let seeded = if ctx.config.survey.seed_from_enrolled {
        session.seed_known(&enrolled)?
    } else {
        0
    };

    let mut sink = EventSink::new(std::io::stdout().lock(), flags.format);
    sink.emit(&SurveyEvent::Started {
        progress: session.progress()?,
        seeded,
    })?;
    let mut rng = rand::thread_rng();
    run_loop(&mut session, &mut rng, std::io::stdin().lock(), &mut sink)
}

/// Verify the respondent with the deployment's scheme. Returns the credential
/// and, for the password scheme, the enrolled course names.
async fn authenticate(
    args: &SurveyArgs,
    ctx: &AppContext,
) -> anyhow::Result<(VerifiedCredential, Vec<String>)> {
    match (ctx.config.auth.method, &args.uid, &args.email) {
        (AuthMethod::Password, Some(uid), _) => {
            let password = read_secret(
                &mut std::io::stdin().lock(),
                (!args.password_stdin).then_some("password"),
            )?;
            let login = ctx.respondent_login()?;
            let credential = login.verify(uid, &password).await?;
            let enrolled = if ctx.config.survey.seed_from_enrolled {
                match login.enrolled_courses(&credential).await {
                    Ok(courses) => courses,
                    Err(error) => {
                        tracing::warn!(%error, "could not fetch enrolled courses; continuing without them");
                        Vec::new()
                    }
                }
            } else {
                Vec::new()
            };
            Ok((credential, enrolled))
        }
        (AuthMethod::EmailPin, _, Some(email)) => {
            let login = ctx.pin_login()?;
            let pin = match &args.pin {
                Some(pin) => pin.clone(),
                None => {
                    let sent_to = login.send(email).await?;
                    eprintln!("verification code sent to {sent_to}");
                    read_secret(&mut std::io::stdin().lock(), Some("verification code"))?
                }
            };
            let credential = login.verify(email, &pin)?;
            Ok((credential, Vec::new()))
        }
        (AuthMethod::Password, None, _) => {
            anyhow::bail!("this deployment uses student ID login; pass --uid")
        }
        (AuthMethod::EmailPin, _, None) => {
            anyhow::bail!("this deployment uses email PIN login; pass --email")
        }
    }
}
