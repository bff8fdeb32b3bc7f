use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex as TokioMutex;

// Specific crates for the data-connection negotiation commands
use crate::core_network::pasv;
use crate::core_network::port;

/// A handler gets the control socket for interim lines and returns the
/// final reply line; a leading '!' asks the session loop to terminate
/// after sending it.
pub type CommandHandler = Box<
    dyn Fn(
            Arc<TokioMutex<TcpStream>>,
            Arc<CommandContext>,
            Arc<TokioMutex<Session>>,
            String, // command argument
        ) -> Pin<Box<dyn Future<Output = Result<String, std::io::Error>> + Send>>
        + Send
        + Sync,
>;

pub fn initialize_command_handlers() -> HashMap<FtpCommand, Arc<CommandHandler>> {
    let mut handlers: HashMap<FtpCommand, Arc<CommandHandler>> = HashMap::new();

    handlers.insert(
        FtpCommand::USER,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::user::handle_user_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PASS,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::pass::handle_pass_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::QUIT,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::quit::handle_quit_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PWD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::pwd::handle_pwd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::XPWD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::pwd::handle_pwd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::LIST,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::list::handle_list_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::NLST,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::list::handle_nlst_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::CWD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::cwd::handle_cwd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::CDUP,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::cdup::handle_cdup_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::XCUP,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::cdup::handle_cdup_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::NOOP,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::noop::handle_noop_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::MKD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::mkd::handle_mkd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::XMKD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::mkd::handle_mkd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RMD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::rmd::handle_rmd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::XRMD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::rmd::handle_rmd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::DELE,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::dele::handle_dele_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RNFR,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::rnfr::handle_rnfr_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RNTO,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::rnto::handle_rnto_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RETR,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::retr::handle_retr_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::STOR,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::stor::handle_stor_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PORT,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(port::handle_port_command(writer, ctx, session, arg))
        })),
    );

    handlers.insert(
        FtpCommand::EPRT,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(port::handle_eprt_command(writer, ctx, session, arg))
        })),
    );

    handlers.insert(
        FtpCommand::PASV,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(pasv::handle_pasv_command(writer, ctx, session, arg))
        })),
    );

    handlers.insert(
        FtpCommand::EPSV,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(pasv::handle_epsv_command(writer, ctx, session, arg))
        })),
    );

    handlers.insert(
        FtpCommand::SITE,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::site::handle_site_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::FEAT,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::feat::handle_feat_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::HELP,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::help::handle_help_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::ALLO,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::allo::handle_allo_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::SYST,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::syst::handle_syst_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::TYPE,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::type_::handle_type_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::SIZE,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::size::handle_size_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::MDTM,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::mdtm::handle_mdtm_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::MFMT,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::mfmt::handle_mfmt_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::STAT,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::stat::handle_stat_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::OPTS,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::opts::handle_opts_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::UTF8,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::opts::handle_utf8_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::REIN,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::rein::handle_rein_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers
}
