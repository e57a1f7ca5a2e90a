//! # Help Text
//!
//! Usage text displayed via the `help` command.

const COMMANDS: &str = concat!(
    "Commands:\n",
    "\tlist\t\tRetrieves a list of the last scraped ads.\n",
    "\tscrape\tRetrieves ads posted since the last scrape.\n",
    "\tinfo\t\tDisplays some basic state information.\n",
    "\thelp\t\tDisplays this help information."
);

const ADMIN_COMMANDS: &str = concat!(
    "\n\nAdmin commands (omit the value to read the current one):\n",
    "\tbotprop <key> [value]\t\tReads or changes a bot property.\n",
    "\tadpref <key> [value]\t\tReads or changes an ad preference.\n",
    "\tsearchparam <key> [value]\tReads or changes a search parameter."
);

pub fn main(name: &str, remote_admin: bool) -> String {
    let mut text = format!(
        "Hi, I'm {name}: the helpful ad-scraping robot!\n\
         I have a few useful commands you can use.\n\
         Prefix a command with my name, so I know you're talking to me.\n\n"
    );
    text.push_str(COMMANDS);
    if remote_admin {
        text.push_str(ADMIN_COMMANDS);
    }
    text
}
