//! Default app → category table, version `BUILTIN_TABLE_VERSION`.
//!
//! Each identifier appears exactly once; extend it with a supplement rather
//! than editing entries in place.

/// Bumped whenever an entry is added, removed or reassigned.
pub const BUILTIN_TABLE_VERSION: u32 = 3;

/// Fine category → productivity bucket.
pub const BUILTIN_PARENT_CATEGORIES: &[(&str, &str)] = &[
    ("Development", "Productive"),
    ("Marketing", "Productive"),
    ("Creative", "Productive"),
    ("AI Productivity", "Productive"),
    ("Productive", "Productive"),
    ("Social Media", "Distracting"),
    ("Entertainment", "Distracting"),
    ("Distracting", "Distracting"),
    ("Utility", "Neutral"),
    ("Browsing", "Neutral"),
    ("Neutral", "Neutral"),
    ("Unknown", "Unknown"),
    ("Other", "Unknown"),
];

/// App bundle identifier → fine category.
pub const BUILTIN_APP_CATEGORIES: &[(&str, &str)] = &[
    // Development
    ("ai.elementlabs.lmstudio", "Development"),
    ("app.codeedit.CodeEdit", "Development"),
    ("app.diagrams.DiagramsMac.mas", "Development"),
    ("cc.arduino.IDE2", "Development"),
    ("com.Ai.NeuroNote", "Development"),
    ("com.Ai.NeuroNote3", "Development"),
    ("com.apple.BuildWebPage", "Development"),
    ("com.apple.dt.AutomationModeUI", "Development"),
    ("com.apple.dt.CommandLineTools.installondemand", "Development"),
    ("com.apple.dt.Xcode", "Development"),
    ("com.apple.iWork.Numbers", "Development"),
    ("com.apple.JavaLauncher", "Development"),
    ("com.apple.MakePDF", "Development"),
    ("com.apple.RealityConverter", "Development"),
    ("com.apple.SFSymbols-beta", "Development"),
    ("com.apple.Terminal", "Development"),
    ("com.apple.TestFlight", "Development"),
    ("com.canva.CanvaDesktop", "Development"),
    ("com.docker.docker", "Development"),
    ("com.electron.ollama", "Development"),
    ("com.figma.Desktop", "Development"),
    ("com.framer.electron", "Development"),
    ("com.github.GitHubClient", "Development"),
    ("com.github.GitHubDesktop", "Development"),
    ("com.microsoft.VSCode", "Development"),
    ("com.mlobodzinski.Stoic", "Development"),
    ("com.mortenjust.Rendermock", "Development"),
    ("com.openai.chat", "Development"),
    ("com.oracle.workbench.MySQLWorkbench", "Development"),
    ("com.postmanlabs.mac", "Development"),
    ("com.roadesign.Codyeapp", "Development"),
    ("com.sebvidal.Snippet", "Development"),
    ("com.swiftLee.RocketSim", "Development"),
    ("com.tcltk.wish", "Development"),
    ("com.termius.mac", "Development"),
    ("de.ixeau.Curve", "Development"),
    ("dev.erikschnell.CodeSnippets", "Development"),
    ("io.balena.etcher", "Development"),
    ("org.blenderfoundation.blender", "Development"),
    ("org.openmv.openmvide", "Development"),
    ("org.prismlauncher.PrismLauncher", "Development"),
    // Marketing
    ("com.apple.FinalCutTrial", "Marketing"),
    ("com.goodsnooze.bakery", "Marketing"),
    ("com.if.Amphetamine", "Marketing"),
    ("com.lukilabs.lukiapp", "Marketing"),
    ("com.timpler.screenstudio", "Marketing"),
    ("us.zoom.xos", "Marketing"),
    ("us.zoom.ZoomAutoUpdater", "Marketing"),
    // Creative
    ("com.apple.FolderActionsSetup", "Creative"),
    ("com.apple.FontBook", "Creative"),
    ("com.apple.freeform", "Creative"),
    ("com.apple.GenerativePlaygroundApp", "Creative"),
    ("com.apple.Photos", "Creative"),
    // Productive
    ("com.Ai.PingPath", "Productive"),
    ("com.Ai.ScribeGuide", "Productive"),
    ("com.apple.Health", "Productive"),
    ("com.apple.iWork.Keynote", "Productive"),
    ("com.apple.iWork.Pages", "Productive"),
    ("com.apple.mobilecal", "Productive"),
    ("com.apple.mobilenotes", "Productive"),
    ("com.apple.mobilesafari", "Productive"),
    ("com.apple.music", "Productive"),
    ("com.apple.shortcuts", "Productive"),
    ("com.danielyaakob.studyTool", "Productive"),
    ("com.google.calendar", "Productive"),
    ("com.google.Docs", "Productive"),
    ("com.google.Gmail", "Productive"),
    ("com.google.Slides", "Productive"),
    ("com.linkedin.LinkedIn", "Productive"),
    ("com.vinsol.strivepd", "Productive"),
    ("notion.id", "Productive"),
    // School
    ("com.install4j.1106-5897-7327-6550.5", "School"),
    ("com.microsoft.teams", "School"),
    ("com.microsoft.Word", "School"),
    // Social Media
    ("Cisco-Systems.Spark", "Social Media"),
    ("com.apple.FaceTime", "Social Media"),
    ("com.hammerandchisel.discord", "Social Media"),
    ("com.hnc.Discord", "Social Media"),
    ("com.tinyspeck.slackmacgap", "Social Media"),
    ("WebEx-PT.webexAppLauncher", "Social Media"),
    // Entertainment
    ("com.apple.Chess", "Entertainment"),
    ("com.apple.DVDPlayer", "Entertainment"),
    ("com.apple.gamecenter", "Entertainment"),
    ("com.apple.iBooksX", "Entertainment"),
    ("com.apple.Music", "Entertainment"),
    ("com.apple.musicrecognition.mac", "Entertainment"),
    ("com.apple.news", "Entertainment"),
    ("com.apple.PhotoBooth", "Entertainment"),
    ("com.apple.podcasts", "Entertainment"),
    ("com.apple.QuickTimePlayerX", "Entertainment"),
    ("com.apple.stocks", "Entertainment"),
    ("com.apple.TV", "Entertainment"),
    ("com.netflix.Netflix", "Entertainment"),
    ("com.nvidia.gfnpc.mall", "Entertainment"),
    // Distracting
    ("com.burbn.instagram", "Distracting"),
    ("com.google.ios.youtube", "Distracting"),
    ("com.reddit.Reddit", "Distracting"),
    // Browsing
    ("com.apple.Safari", "Browsing"),
    ("com.google.Chrome", "Browsing"),
    ("company.thebrowser.Browser", "Browsing"),
    // Utility
    ("com.apple.50onPaletteIM", "Utility"),
    ("com.apple.ABAssistantService", "Utility"),
    ("com.apple.accessibility.AXVisualSupportAgent", "Utility"),
    ("com.apple.accessibility.DFRHUD", "Utility"),
    ("com.apple.accessibility.LiveSpeech", "Utility"),
    ("com.apple.accessibility.LiveTranscriptionAgent", "Utility"),
    ("com.apple.accessibility.universalAccessAuthWarn", "Utility"),
    ("com.apple.AccessibilityOnboarding", "Utility"),
    ("com.apple.AccessibilityVisualsAgent", "Utility"),
    ("com.apple.ActivityMonitor", "Utility"),
    ("com.apple.AddressBook", "Utility"),
    ("com.apple.AddressBook.abd", "Utility"),
    ("com.apple.AddressBook.sync", "Utility"),
    ("com.apple.AddressBookSourceSync", "Utility"),
    ("com.apple.airport.airportutility", "Utility"),
    ("com.apple.AirScanScanner", "Utility"),
    ("com.apple.AMSEngagementViewService", "Utility"),
    ("com.apple.AOSAlertManager", "Utility"),
    ("com.apple.AOSHeartbeat", "Utility"),
    ("com.apple.AOSPushRelay", "Utility"),
    ("com.apple.appleseed.FeedbackAssistant", "Utility"),
    ("com.apple.AppSSOAgent", "Utility"),
    ("com.apple.AppStore", "Utility"),
    ("com.apple.AquaAppearanceHelper", "Utility"),
    ("com.apple.archiveutility", "Utility"),
    ("com.apple.AskPermissionUI", "Utility"),
    ("com.apple.AskToMessagesHost", "Utility"),
    ("com.apple.audio.AudioMIDISetup", "Utility"),
    ("com.apple.AutoFillPanelService", "Utility"),
    ("com.apple.Automator", "Utility"),
    ("com.apple.Automator.Automator-Application-Stub", "Utility"),
    ("com.apple.AutomatorInstaller", "Utility"),
    ("com.apple.backgroundtaskmanagement.agent", "Utility"),
    ("com.apple.backup.launcher", "Utility"),
    ("com.apple.Batteries", "Utility"),
    ("com.apple.bird", "Utility"),
    ("com.apple.BluetoothFileExchange", "Utility"),
    ("com.apple.BluetoothSetupAssistant", "Utility"),
    ("com.apple.BluetoothUIServer", "Utility"),
    ("com.apple.BluetoothUIService", "Utility"),
    ("com.apple.bootcampassistant", "Utility"),
    ("com.apple.calculator", "Utility"),
    ("com.apple.calendar", "Utility"),
    ("com.apple.CalendarFileHandler", "Utility"),
    ("com.apple.Calibration-Assistant", "Utility"),
    ("com.apple.CaptiveNetworkAssistant", "Utility"),
    ("com.apple.CCE.CIMFindInputCode", "Utility"),
    ("com.apple.CertificateAssistant", "Utility"),
    ("com.apple.CharacterPaletteIM", "Utility"),
    ("com.apple.ChineseTextConverterService", "Utility"),
    ("com.apple.clock", "Utility"),
    ("com.apple.CloudKit.ShareBear", "Utility"),
    ("com.apple.CMViewSrvc", "Utility"),
    ("com.apple.ColorSyncUtility", "Utility"),
    ("com.apple.configurator.ui", "Utility"),
    ("com.apple.Console", "Utility"),
    ("com.apple.ContinuityCaptureOnboardingUI", "Utility"),
    ("com.apple.controlcenter", "Utility"),
    ("com.apple.controlstrip", "Utility"),
    ("com.apple.CoreLocationAgent", "Utility"),
    ("com.apple.coreservices.UASharedPasteboardProgressUI", "Utility"),
    ("com.apple.coreservices.uiagent", "Utility"),
    ("com.apple.ctkbind", "Utility"),
    ("com.apple.databaseevents", "Utility"),
    ("com.apple.DeskCam", "Utility"),
    ("com.apple.DiagnosticsReporter", "Utility"),
    ("com.apple.Dictionary", "Utility"),
    ("com.apple.DigitalColorMeter", "Utility"),
    ("com.apple.DirectoryUtility", "Utility"),
    ("com.apple.DiscHelper", "Utility"),
    ("com.apple.DiskImageMounter", "Utility"),
    ("com.apple.DiskUtility", "Utility"),
    ("com.apple.displaycalibrator", "Utility"),
    ("com.apple.dock", "Utility"),
    ("com.apple.DwellControl", "Utility"),
    ("com.apple.eap8021x.eaptlstrust", "Utility"),
    ("com.apple.EmojiFunctionRowItem-Container", "Utility"),
    ("com.apple.EnhancedLogging", "Utility"),
    ("com.apple.EraseAssistant", "Utility"),
    ("com.apple.EscrowSecurityAlert", "Utility"),
    ("com.apple.ExpansionSlotUtility", "Utility"),
    ("com.apple.exposelauncher", "Utility"),
    ("com.apple.Family", "Utility"),
    ("com.apple.familycontrols.useragent", "Utility"),
    ("com.apple.FeedbackRemoteView", "Utility"),
    ("com.apple.FileProvider-Feedback", "Utility"),
    ("com.apple.finder", "Utility"),
    ("com.apple.Finder", "Utility"),
    ("com.apple.findmy", "Utility"),
    ("com.apple.FindMyMacMessenger", "Utility"),
    ("com.apple.FolderActionsDispatcher", "Utility"),
    ("com.apple.FollowUpUI", "Utility"),
    ("com.apple.FontRegistryUIAgent", "Utility"),
    ("com.apple.frameworks.diskimages.diuiagent", "Utility"),
    ("com.apple.grapher", "Utility"),
    ("com.apple.helpviewer", "Utility"),
    ("com.apple.Home", "Utility"),
    ("com.apple.iCal", "Utility"),
    ("com.apple.iCloudUserNotificationsd", "Utility"),
    ("com.apple.icq", "Utility"),
    ("com.apple.identityservicesd", "Utility"),
    ("com.apple.idsfoundation.IDSRemoteURLConnectionAgent", "Utility"),
    ("com.apple.Image_Capture", "Utility"),
    ("com.apple.imageevents", "Utility"),
    ("com.apple.imagent", "Utility"),
    ("com.apple.IMAutomaticHistoryDeletionAgent", "Utility"),
    ("com.apple.imtransferservices.IMTransferAgent", "Utility"),
    ("com.apple.inputmethod.Ainu", "Utility"),
    ("com.apple.inputmethod.AssistiveControl", "Utility"),
    ("com.apple.inputmethod.ironwood", "Utility"),
    ("com.apple.inputmethod.PluginIM", "Utility"),
    ("com.apple.inputmethod.Tamil", "Utility"),
    ("com.apple.installer", "Utility"),
    ("com.apple.Installer-Progress", "Utility"),
    ("com.apple.IOUIAgent", "Utility"),
    ("com.apple.IPAInstaller", "Utility"),
    ("com.apple.JapaneseIM.KanaTyping", "Utility"),
    ("com.apple.JapaneseIM.RomajiTyping", "Utility"),
    ("com.apple.KerberosMenuExtra", "Utility"),
    ("com.apple.KeyboardAccessAgent", "Utility"),
    ("com.apple.KeyboardSetupAssistant", "Utility"),
    ("com.apple.keychainaccess", "Utility"),
    ("com.apple.KIM-Container", "Utility"),
    ("com.apple.Language-Chooser", "Utility"),
    ("com.apple.launchpad.launcher", "Utility"),
    ("com.apple.LinkedNotesUIService", "Utility"),
    ("com.apple.mail", "Utility"),
    ("com.apple.ManagedClient", "Utility"),
    ("com.apple.Maps", "Utility"),
    ("com.apple.mcx.ProfileHelper", "Utility"),
    ("com.apple.MediaMLPluginApp", "Utility"),
    ("com.apple.MemorySlotUtility", "Utility"),
    ("com.apple.MigrateAssistant", "Utility"),
    ("com.apple.MobileSMS", "Utility"),
    ("com.apple.MTLReplayer", "Utility"),
    ("com.apple.nbagent", "Utility"),
    ("com.apple.NetAuthAgent", "Utility"),
    ("com.apple.NewDeviceOutreachApp", "Utility"),
    ("com.apple.notes", "Utility"),
    ("com.apple.Notes", "Utility"),
    ("com.apple.notificationcenterui", "Utility"),
    ("com.apple.NowPlayingTouchUI", "Utility"),
    ("com.apple.OAHSoftwareUpdateApp", "Utility"),
    ("com.apple.OBEXAgent", "Utility"),
    ("com.apple.ODSAgent", "Utility"),
    ("com.apple.OSDUIHelper", "Utility"),
    ("com.apple.PackageUIKit.Install-in-Progress", "Utility"),
    ("com.apple.PAH-Container", "Utility"),
    ("com.apple.PairedDevices", "Utility"),
    ("com.apple.Pass-Viewer", "Utility"),
    ("com.apple.Passwords", "Utility"),
    ("com.apple.PeopleMessageService", "Utility"),
    ("com.apple.PeopleViewService", "Utility"),
    ("com.apple.PIPAgent", "Utility"),
    ("com.apple.pluginIM.pluginIMRegistrator", "Utility"),
    ("com.apple.PowerChime", "Utility"),
    ("com.apple.Preview", "Utility"),
    ("com.apple.PreviewShell", "Utility"),
    ("com.apple.printcenter", "Utility"),
    ("com.apple.privatecloudcomputed", "Utility"),
    ("com.apple.ProblemReporter", "Utility"),
    ("com.apple.quicklook.qlmanage", "Utility"),
    ("com.apple.quicklook.QuickLookSimulator", "Utility"),
    ("com.apple.quicklook.ui.helper", "Utility"),
    ("com.apple.QuickLookDaemon", "Utility"),
    ("com.apple.RapportUIAgent", "Utility"),
    ("com.apple.reminders", "Utility"),
    ("com.apple.RemoteDesktopAgent", "Utility"),
    ("com.apple.RemoteDesktopMessageAgent", "Utility"),
    ("com.apple.SCIM-Container", "Utility"),
    ("com.apple.screencaptureui", "Utility"),
    ("com.apple.ScreenContinuity", "Utility"),
    ("com.apple.ScreenReaderUIServer", "Utility"),
    ("com.apple.ScreenSaver.Engine", "Utility"),
    ("com.apple.ScreenSharing", "Utility"),
    ("com.apple.screenshot.launcher", "Utility"),
    ("com.apple.ScreenTimeWidgetApplication", "Utility"),
    ("com.apple.scriptEditor", "Utility"),
    ("com.apple.ScriptEditor2", "Utility"),
    ("com.apple.ScriptMenuApp", "Utility"),
    ("com.apple.ScriptMonitor", "Utility"),
    ("com.apple.security.Keychain-Circle-Notification", "Utility"),
    ("com.apple.SetupAssistant", "Utility"),
    ("com.apple.shortcuts.droplet", "Utility"),
    ("com.apple.shortcuts.events", "Utility"),
    ("com.apple.ShortcutsActions", "Utility"),
    ("com.apple.Siri", "Utility"),
    ("com.apple.siri.launcher", "Utility"),
    ("com.apple.sociallayerd", "Utility"),
    ("com.apple.SoftwareUpdate", "Utility"),
    ("com.apple.SoftwareUpdateNotificationManager", "Utility"),
    ("com.apple.SpacesTouchBarAgent", "Utility"),
    ("com.apple.speech.SpeechDataInstallerd", "Utility"),
    ("com.apple.speech.SpeechRecognitionServer", "Utility"),
    ("com.apple.speech.synthesis.SpeechSynthesisServer", "Utility"),
    ("com.apple.Spotlight", "Utility"),
    ("com.apple.SSMenuAgent", "Utility"),
    ("com.apple.Stickies", "Utility"),
    ("com.apple.STMFramework.UIHelper", "Utility"),
    ("com.apple.storeuid", "Utility"),
    ("com.apple.SummaryService", "Utility"),
    ("com.apple.syncserver", "Utility"),
    ("com.apple.syncservices.ConflictResolver", "Utility"),
    ("com.apple.syncservices.syncuid", "Utility"),
    ("com.apple.systemevents", "Utility"),
    ("com.apple.SystemPreferences", "Utility"),
    ("com.apple.systempreferences", "Utility"),
    ("com.apple.SystemProfiler", "Utility"),
    ("com.apple.systemuiserver", "Utility"),
    ("com.apple.TCIM-Container", "Utility"),
    ("com.apple.TextEdit", "Utility"),
    ("com.apple.TextInputMenuAgent", "Utility"),
    ("com.apple.TextInputSwitcher", "Utility"),
    ("com.apple.ThermalTrap", "Utility"),
    ("com.apple.Ticket-Viewer", "Utility"),
    ("com.apple.timemachine.HelperAgent", "Utility"),
    ("com.apple.tips", "Utility"),
    ("com.apple.TrackpadIM-Container", "Utility"),
    ("com.apple.TransliterationIM-Container", "Utility"),
    ("com.apple.TYIM-Container", "Utility"),
    ("com.apple.UIKitSystemApp", "Utility"),
    ("com.apple.UniversalAccessControl", "Utility"),
    ("com.apple.universalcontrol", "Utility"),
    ("com.apple.UnmountAssistantAgent", "Utility"),
    ("com.apple.UserNotificationCenter", "Utility"),
    ("com.apple.VIM-Container", "Utility"),
    ("com.apple.VoiceMemos", "Utility"),
    ("com.apple.VoiceOver", "Utility"),
    ("com.apple.VoiceOverQuickstart", "Utility"),
    ("com.apple.VoiceOverUtility", "Utility"),
    ("com.apple.wallpaper.agent", "Utility"),
    ("com.apple.WatchFaceAlert", "Utility"),
    ("com.apple.weather", "Utility"),
    ("com.apple.widgetkit.simulator", "Utility"),
    ("com.apple.wifi.diagnostics", "Utility"),
    ("com.apple.wifi.WiFiAgent", "Utility"),
    ("com.apple.WindowManager", "Utility"),
    ("com.apple.windowmanager.ShowDesktopEducation", "Utility"),
    ("com.apple.windowmanager.StageManagerOnboarding", "Utility"),
    ("com.apple.WorkoutAlert-Mac", "Utility"),
    ("com.macpaw.CleanMyMac-mas", "Utility"),
    ("monitorproduct", "Utility"),
    ("org.raspberrypi.imagingutility", "Utility"),
    // Neutral
    ("com.apple.camera", "Neutral"),
    ("com.apple.contacts", "Neutral"),
    ("com.apple.dictionary", "Neutral"),
    ("com.apple.maps", "Neutral"),
    ("com.apple.mobilephone", "Neutral"),
    ("com.spotify.client", "Neutral"),
    // System
    ("com.apple.AboutThisMacLauncher", "System"),
    ("com.apple.AddressBook.UrlForwarder", "System"),
    ("com.apple.AirPlayUIAgent", "System"),
    ("com.apple.AirPortBaseStationAgent", "System"),
    ("com.apple.AOSUIPrefPaneLauncher", "System"),
    ("com.apple.AppleScriptUtility", "System"),
    ("com.apple.AVB-Audio-Configuration", "System"),
    ("com.apple.ClassroomStudentMenuExtra", "System"),
    ("com.apple.ColorSyncCalibrator", "System"),
    ("com.apple.loginwindow", "System"),
    ("com.apple.MobileDeviceUpdater", "System"),
    ("com.apple.MRT", "System"),
    ("com.apple.print.add", "System"),
    ("com.apple.print.AirScanLegacyDiscovery", "System"),
    ("com.apple.python3", "System"),
    ("com.apple.rcd", "System"),
    ("com.apple.ScriptEditor.id.cocoa-applet-template", "System"),
    ("com.apple.ScriptEditor.id.droplet-with-settable-properties-template", "System"),
    ("com.apple.ScriptEditor.id.file-processing-droplet-template", "System"),
    ("com.apple.ScriptEditor.id.image-file-processing-droplet-template", "System"),
    ("com.apple.SyncServices.AppleMobileDeviceHelper", "System"),
    ("com.apple.SyncServices.AppleMobileSync", "System"),
    ("com.apple.XProtectFramework.XProtect", "System"),
    ("com.dotnet.shared.Microsoft.AspNetCore.App", "System"),
    ("com.dotnet.shared.Microsoft.NETCore.App", "System"),
    ("liquiddetectiond.app", "System"),
    // Unknown
    ("Bento|Craft.app", "Unknown"),
    ("com.jomo.Jomo", "Unknown"),
    ("com.nonstrict.Bezel-appstore", "Unknown"),
    ("My School.app", "Unknown"),
    ("Odio.app", "Unknown"),
    ("SchoolMate.app", "Unknown"),
];
