use colored::*;
use huddle::ChatMessage;
use huddle::client::LinkSnapshot;
use huddle::model::MemberId;

pub fn banner(room: &str, local_id: &MemberId) {
    println!(
        "{} {} {}",
        "Joined".green().bold(),
        room.bold(),
        format!("as {}", local_id.short()).dimmed()
    );
    println!("{}", "Type a message, /peers to list peers, /quit to leave.".dimmed());
}

pub fn own_message(text: &str) {
    let time = chrono::Local::now().format("%H:%M:%S");
    println!("{} {}", format!("You - {}", time).blue().bold(), text);
}

pub fn peer_message(from: &MemberId, message: &ChatMessage) {
    let time = message.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
    println!(
        "{} {}",
        format!("Peer {} - {}", from.short(), time).magenta().bold(),
        message.content
    );
}

pub fn local_only() {
    println!(
        "{}",
        "No peers connected. The message was kept locally.".yellow()
    );
}

pub fn system(text: &str) {
    println!("{}", text.yellow());
}

pub fn error(text: &str) {
    eprintln!("{} {}", "error:".red().bold(), text);
}

pub fn peers(peers: &[LinkSnapshot]) {
    if peers.is_empty() {
        println!("{}", "No peers in this room.".dimmed());
        return;
    }
    for peer in peers {
        println!(
            "  {} {:<18} {}",
            peer.remote.short().as_str().cyan(),
            peer.state.to_string(),
            format!("{:?}", peer.role).to_lowercase().dimmed()
        );
    }
}
